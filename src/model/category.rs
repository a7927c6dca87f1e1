//! Category data as ingested from the budget server.

use crate::model::Amount;

/// Immutable snapshot of one budget category for one month.
///
/// Produced at the ingestion boundary from the server's wire records, with
/// amounts already validated and converted to decimal dollars. Consumed once
/// per report build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub category_id: String,
    pub category_name: String,
    /// `None` when the server record carried no group. The aggregator files
    /// these under the `Ungrouped` sentinel rather than dropping them.
    pub group_name: Option<String>,
    /// Planned spending for the month.
    pub budgeted: Amount,
    /// Sum of transaction amounts posted against the category in the month.
    pub spent: Amount,
}

impl CategoryRecord {
    pub fn new(
        category_id: impl Into<String>,
        category_name: impl Into<String>,
        group_name: Option<String>,
        budgeted: Amount,
        spent: Amount,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            category_name: category_name.into(),
            group_name,
            budgeted,
            spent,
        }
    }
}
