//! The monthly budget report produced by the aggregator.

use crate::model::Amount;

/// One line of the budget report: a single category within its group.
///
/// `balance` is per-row (budgeted minus actual for this category alone), not a
/// cumulative total across rows, despite the "Running Balance" column label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub group_name: String,
    pub category_name: String,
    pub budgeted: Amount,
    pub actual: Amount,
    pub balance: Amount,
}

/// Exact sums over every [`ReportRow`] in the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalsRow {
    pub budgeted: Amount,
    pub actual: Amount,
    pub balance: Amount,
}

/// A complete report for one month, built fresh on every sync run and never
/// persisted locally.
///
/// Rows are grouped by group name, groups sorted alphabetically and categories
/// sorted alphabetically within each group, both case-insensitively. The
/// ordering is deterministic for identical input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReport {
    /// e.g. "January 2024".
    pub month_label: String,
    pub rows: Vec<ReportRow>,
    pub totals: TotalsRow,
}

impl MonthlyReport {
    /// A report with no rows and a zeroed totals row, the valid "no data yet"
    /// state for a month with no category records.
    pub fn empty(month_label: impl Into<String>) -> Self {
        Self {
            month_label: month_label.into(),
            rows: Vec::new(),
            totals: TotalsRow::default(),
        }
    }
}
