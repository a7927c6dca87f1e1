//! Boundaries to the two external collaborators.
//!
//! `BudgetSource` is the budget data collaborator (an Actual Budget server)
//! and `SheetWriter` is the spreadsheet collaborator (a Google sheet). Both
//! are traits so the sync driver can run against in-memory fakes.

mod actual;
mod oauth;
mod sheet;
mod test_client;

use crate::error::Result;
use crate::model::{CategoryRecord, TransactionRow};
use crate::Config;
use chrono::NaiveDate;

pub(crate) use oauth::{ServiceAccountKey, TokenProvider};
#[cfg(test)]
pub(crate) use test_client::{TestBudget, TestBudgetState, TestSheet};

/// The budget data collaborator, opened once per run and closed on exit.
#[async_trait::async_trait]
pub(crate) trait BudgetSource {
    /// Category records for one month, identified by its "YYYY-MM" key.
    async fn categories(&mut self, month_key: &str) -> Result<Vec<CategoryRecord>>;

    /// Transactions within `[start, end]` inclusive, date-descending.
    async fn transactions(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRow>>;

    /// Releases the session. Called on both the success and failure paths.
    async fn close(&mut self);
}

/// The spreadsheet collaborator. `write_tab` fully replaces tab contents and
/// creates the tab when absent.
#[async_trait::async_trait]
pub(crate) trait SheetWriter {
    async fn write_tab(&mut self, tab_name: &str, rows: &[Vec<String>]) -> Result<()>;
}

/// Whether to use the real collaborators or the in-memory test doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Test,
}

impl Mode {
    /// This allows for testing the program without hitting either external
    /// service. When ACTUAL_SHEETS_IN_TEST_MODE is set and non-zero in length,
    /// the mode will be `Mode::Test`, otherwise it will be `Mode::Live`.
    pub fn from_env() -> Mode {
        match std::env::var("ACTUAL_SHEETS_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Live,
        }
    }
}

/// Opens a session with the budget data collaborator.
pub(crate) async fn budget_source(
    config: &Config,
    mode: Mode,
) -> Result<Box<dyn BudgetSource + Send>> {
    match mode {
        Mode::Live => Ok(Box::new(actual::ActualSession::open(config).await?)),
        Mode::Test => Ok(Box::new(test_client::TestBudget::new(config.file_name()))),
    }
}

/// Creates the spreadsheet collaborator.
pub(crate) fn sheet_writer(config: &Config, mode: Mode) -> Box<dyn SheetWriter + Send> {
    match mode {
        Mode::Live => {
            let token_provider = TokenProvider::new(config.credentials().clone());
            Box::new(sheet::GoogleSheet::new(config.sheet_id(), token_provider))
        }
        Mode::Test => Box::new(test_client::TestSheet::new(config.sheet_id())),
    }
}
