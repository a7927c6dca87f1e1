//! In-memory implementations of the collaborator traits for testing.
//!
//! Note: this is compiled even in the "production" version of this app so that
//! we can run the whole sync, top-to-bottom, without reaching either the
//! Actual server or Google Sheets (see `Mode`).

use crate::api::{BudgetSource, SheetWriter};
use crate::error::Result;
use crate::model::{CategoryRecord, TransactionRow};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{LazyLock, Mutex};

/// Tab name -> rows, as last written.
pub(crate) type TestSheetState = BTreeMap<String, Vec<Vec<String>>>;

/// Month key ("YYYY-MM") -> category records, plus a flat transaction list.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestBudgetState {
    pub(crate) categories_by_month: BTreeMap<String, Vec<CategoryRecord>>,
    pub(crate) transactions: Vec<TransactionRow>,
}

static SHEETS: LazyLock<Mutex<BTreeMap<String, TestSheetState>>> =
    LazyLock::new(|| Mutex::new(BTreeMap::new()));
static BUDGETS: LazyLock<Mutex<BTreeMap<String, TestBudgetState>>> =
    LazyLock::new(|| Mutex::new(BTreeMap::new()));

/// An implementation of `BudgetSource` backed by seeded in-memory data, keyed
/// by the configured budget file name so concurrent tests do not collide.
pub(crate) struct TestBudget {
    file_name: String,
}

impl TestBudget {
    pub(crate) fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub(crate) fn set_state(&self, state: TestBudgetState) {
        BUDGETS
            .lock()
            .expect("test budget state poisoned")
            .insert(self.file_name.clone(), state);
    }

    fn state(&self) -> TestBudgetState {
        BUDGETS
            .lock()
            .expect("test budget state poisoned")
            .get(&self.file_name)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl BudgetSource for TestBudget {
    async fn categories(&mut self, month_key: &str) -> Result<Vec<CategoryRecord>> {
        Ok(self
            .state()
            .categories_by_month
            .get(month_key)
            .cloned()
            .unwrap_or_default())
    }

    async fn transactions(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRow>> {
        let mut rows: Vec<TransactionRow> = self
            .state()
            .transactions
            .into_iter()
            .filter(|tx| tx.date >= start && tx.date <= end)
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn close(&mut self) {}
}

/// An implementation of `SheetWriter` that records written tabs in memory,
/// keyed by spreadsheet id.
pub(crate) struct TestSheet {
    sheet_id: String,
}

impl TestSheet {
    pub(crate) fn new(sheet_id: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
        }
    }

    pub(crate) fn get_state(&self) -> TestSheetState {
        SHEETS
            .lock()
            .expect("test sheet state poisoned")
            .get(&self.sheet_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl SheetWriter for TestSheet {
    async fn write_tab(&mut self, tab_name: &str, rows: &[Vec<String>]) -> Result<()> {
        SHEETS
            .lock()
            .expect("test sheet state poisoned")
            .entry(self.sheet_id.clone())
            .or_default()
            .insert(tab_name.to_string(), rows.to_vec());
        Ok(())
    }
}
