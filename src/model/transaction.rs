//! Transaction data as ingested from the budget server.

use crate::model::Amount;
use chrono::NaiveDate;

/// One transaction in the selected date range, ready for tabular export.
///
/// No aggregation is applied to transactions; rows keep the order they were
/// given at ingestion (date-descending, most recent first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub date: NaiveDate,
    pub account: String,
    pub payee: String,
    pub category: String,
    pub description: String,
    pub amount: Amount,
    pub cleared: bool,
}
