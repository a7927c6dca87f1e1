//! The budget-report aggregation engine.
//!
//! Turns a flat, unordered collection of category records for one month into
//! grouped, sorted, totaled report rows. Pure transformation, no I/O.

use crate::model::{Amount, CategoryRecord, MonthlyReport, ReportRow, TotalsRow};
use tracing::warn;

/// Sentinel group for records whose group name is missing or blank. Records
/// are never dropped for lacking a group.
pub const UNGROUPED: &str = "Ungrouped";

/// Builds the monthly report for `month_label` from `records`.
///
/// Rows are ordered by group name, then category name, both case-insensitive
/// and stable for ties. Each row's balance is budgeted minus actual for that
/// category alone. The totals row is the exact decimal sum of every row.
///
/// Empty input is a valid "no data yet" state and produces a report with zero
/// rows and a zeroed totals row.
pub fn monthly_report(records: Vec<CategoryRecord>, month_label: impl Into<String>) -> MonthlyReport {
    let month_label = month_label.into();
    if records.is_empty() {
        warn!("No category records for {month_label}, producing an empty report");
        return MonthlyReport::empty(month_label);
    }

    let mut rows: Vec<ReportRow> = records
        .into_iter()
        .map(|record| {
            let group_name = record
                .group_name
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(|| UNGROUPED.to_string());
            let balance = record.budgeted - record.spent;
            ReportRow {
                group_name,
                category_name: record.category_name,
                budgeted: record.budgeted,
                actual: record.spent,
                balance,
            }
        })
        .collect();

    // Stable sort, so records that compare equal case-insensitively keep
    // their input order.
    rows.sort_by_key(|row| {
        (
            row.group_name.to_lowercase(),
            row.category_name.to_lowercase(),
        )
    });

    let totals = TotalsRow {
        budgeted: rows.iter().map(|r| r.budgeted).sum(),
        actual: rows.iter().map(|r| r.actual).sum(),
        balance: rows.iter().map(|r| r.balance).sum(),
    };

    MonthlyReport {
        month_label,
        rows,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(group: Option<&str>, category: &str, budgeted: i64, spent: i64) -> CategoryRecord {
        CategoryRecord::new(
            format!("id-{category}"),
            category,
            group.map(str::to_string),
            Amount::from_minor_units(budgeted),
            Amount::from_minor_units(spent),
        )
    }

    #[test]
    fn test_groups_and_categories_sorted() {
        let records = vec![
            record(Some("Food"), "Groceries", 50000, 52345),
            record(Some("Bills"), "Water", 5000, 4820),
            record(Some("Food"), "Dining", 20000, 18967),
            record(Some("Bills"), "Electric", 15000, 14532),
        ];
        let report = monthly_report(records, "January 2024");
        let order: Vec<(&str, &str)> = report
            .rows
            .iter()
            .map(|r| (r.group_name.as_str(), r.category_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Bills", "Electric"),
                ("Bills", "Water"),
                ("Food", "Dining"),
                ("Food", "Groceries"),
            ]
        );
    }

    #[test]
    fn test_sorting_is_case_insensitive() {
        let records = vec![
            record(Some("bills"), "water", 0, 0),
            record(Some("Bills"), "Electric", 0, 0),
            record(Some("auto"), "Gas", 0, 0),
        ];
        let report = monthly_report(records, "January 2024");
        let groups: Vec<&str> = report.rows.iter().map(|r| r.group_name.as_str()).collect();
        assert_eq!(groups, vec!["auto", "bills", "Bills"]);
        // "bills"/"Bills" compare equal case-insensitively; stable sort keeps
        // input order between them.
        assert_eq!(report.rows[1].category_name, "water");
        assert_eq!(report.rows[2].category_name, "Electric");
    }

    #[test]
    fn test_per_row_balance_is_not_cumulative() {
        let records = vec![
            record(Some("Bills"), "Electric", 15000, 14532),
            record(Some("Bills"), "Water", 5000, 4820),
        ];
        let report = monthly_report(records, "January 2024");
        assert_eq!(report.rows[0].balance, Amount::from_minor_units(468));
        assert_eq!(report.rows[1].balance, Amount::from_minor_units(180));
    }

    #[test]
    fn test_totals_are_exact_sums() {
        let records = vec![
            record(Some("Bills"), "Electric", 15000, 14532),
            record(Some("Bills"), "Water", 5000, 4820),
            record(Some("Food"), "Groceries", 50000, 52345),
            record(Some("Food"), "Dining", 20000, 18967),
        ];
        let report = monthly_report(records, "January 2024");
        assert_eq!(report.totals.budgeted, Amount::from_minor_units(90000));
        assert_eq!(report.totals.actual, Amount::from_minor_units(90664));
        assert_eq!(report.totals.balance, Amount::from_minor_units(-664));
        let row_budgeted: Amount = report.rows.iter().map(|r| r.budgeted).sum();
        assert_eq!(report.totals.budgeted, row_budgeted);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let report = monthly_report(Vec::new(), "January 2024");
        assert!(report.rows.is_empty());
        assert_eq!(report.totals, TotalsRow::default());
        assert_eq!(report.month_label, "January 2024");
    }

    #[test]
    fn test_missing_group_goes_to_ungrouped() {
        let records = vec![
            record(None, "Mystery", 1000, 500),
            record(Some("   "), "Blank", 1000, 500),
            record(Some("Bills"), "Electric", 15000, 14532),
        ];
        let report = monthly_report(records, "January 2024");
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].group_name, "Bills");
        assert_eq!(report.rows[1].group_name, UNGROUPED);
        assert_eq!(report.rows[2].group_name, UNGROUPED);
    }

    #[test]
    fn test_unique_group_category_pairs() {
        let records = vec![
            record(Some("Bills"), "Electric", 15000, 14532),
            record(Some("Bills"), "Water", 5000, 4820),
            record(Some("Food"), "Groceries", 50000, 52345),
        ];
        let report = monthly_report(records, "January 2024");
        let mut pairs: Vec<(String, String)> = report
            .rows
            .iter()
            .map(|r| (r.group_name.clone(), r.category_name.clone()))
            .collect();
        pairs.dedup();
        assert_eq!(pairs.len(), report.rows.len());
    }

    #[test]
    fn test_deterministic_across_input_orderings() {
        let forward = vec![
            record(Some("Bills"), "Electric", 15000, 14532),
            record(Some("Food"), "Dining", 20000, 18967),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            monthly_report(forward, "January 2024"),
            monthly_report(reversed, "January 2024")
        );
    }
}
