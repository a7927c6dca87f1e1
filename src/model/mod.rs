mod amount;
mod category;
mod report;
mod transaction;

pub use amount::Amount;
pub use category::CategoryRecord;
pub use report::{MonthlyReport, ReportRow, TotalsRow};
pub use transaction::TransactionRow;
