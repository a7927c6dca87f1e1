mod aggregate;
mod render;

pub use aggregate::{monthly_report, UNGROUPED};
pub use render::{budget_rows, transaction_rows, BUDGET_HEADERS, TRANSACTION_HEADERS};
