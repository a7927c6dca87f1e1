//! The sync driver: one sequential pass per invocation.
//!
//! Fetch previous- and current-month categories (and transactions when
//! enabled) from the budget server, aggregate and render each month, then
//! replace the spreadsheet tabs in order. Scheduling is entirely external;
//! there is no retry and no rollback of tabs already written.

use crate::api::{self, BudgetSource, Mode, SheetWriter};
use crate::config::WritePolicy;
use crate::dates::MonthWindow;
use crate::error::Result;
use crate::model::{CategoryRecord, TransactionRow};
use crate::{report, Config};
use chrono::{Local, NaiveDate};
use tracing::{error, info};

pub const PREVIOUS_MONTH_TAB: &str = "Previous Month Budget";
pub const CURRENT_MONTH_TAB: &str = "Current Month Budget";
pub const TRANSACTIONS_TAB: &str = "Transactions";

struct FetchedData {
    previous: Vec<CategoryRecord>,
    current: Vec<CategoryRecord>,
    /// Tab title and rows, when transaction export is enabled.
    transactions: Option<(String, Vec<TransactionRow>)>,
}

/// Runs one full sync and returns when every tab has been written (or a fatal
/// error has been hit, per the configured write policy).
pub async fn run(config: Config, mode: Mode) -> Result<()> {
    run_at(config, mode, Local::now().date_naive()).await
}

/// Like [`run`], with the run date injected so tests are deterministic.
async fn run_at(config: Config, mode: Mode, today: NaiveDate) -> Result<()> {
    let previous = MonthWindow::containing(today, -1);
    let current = MonthWindow::containing(today, 0);
    info!(
        "Starting sync for {} and {} to sheet {}",
        previous.label,
        current.label,
        config.sheet_id()
    );

    let mut source = api::budget_source(&config, mode).await?;
    let fetched = fetch(source.as_mut(), &config, &previous, &current, today).await;
    // Release the session on both paths before touching the spreadsheet.
    source.close().await;
    let fetched = fetched?;

    let previous_report = report::monthly_report(fetched.previous, &previous.label);
    let current_report = report::monthly_report(fetched.current, &current.label);

    let mut tabs: Vec<(&str, Vec<Vec<String>>)> = vec![
        (PREVIOUS_MONTH_TAB, report::budget_rows(&previous_report)),
        (CURRENT_MONTH_TAB, report::budget_rows(&current_report)),
    ];
    if let Some((title, transactions)) = &fetched.transactions {
        tabs.push((
            TRANSACTIONS_TAB,
            report::transaction_rows(title, transactions),
        ));
    }

    let mut writer = api::sheet_writer(&config, mode);
    write_tabs(writer.as_mut(), config.write_failure_policy(), tabs).await?;

    info!("Sync complete");
    Ok(())
}

async fn fetch(
    source: &mut (dyn BudgetSource + Send),
    config: &Config,
    previous: &MonthWindow,
    current: &MonthWindow,
    today: NaiveDate,
) -> Result<FetchedData> {
    info!("Extracting data for {}", previous.label);
    let previous_records = source.categories(&previous.month_key()).await?;
    info!("Extracting data for {}", current.label);
    let current_records = source.categories(&current.month_key()).await?;

    let transactions = if config.export_transactions() {
        let range = config.transactions_date_range();
        let windows = range.windows(today);
        // The windows are contiguous months, so the fetch span is the first
        // window's start through the last window's end.
        let (start, end) = match (windows.first(), windows.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (today, today),
        };
        info!("Extracting transactions from {start} to {end}");
        let rows = source.transactions(start, end).await?;
        Some((range.tab_title(today), rows))
    } else {
        None
    };

    Ok(FetchedData {
        previous: previous_records,
        current: current_records,
        transactions,
    })
}

/// Writes each tab in order. With `WritePolicy::Abort` the first failure stops
/// the run; with `WritePolicy::BestEffort` every tab is attempted and the
/// first error is returned afterwards.
async fn write_tabs(
    writer: &mut (dyn SheetWriter + Send),
    policy: WritePolicy,
    tabs: Vec<(&str, Vec<Vec<String>>)>,
) -> Result<()> {
    let mut first_error = None;
    for (tab_name, rows) in tabs {
        info!("Updating '{tab_name}' tab with {} rows", rows.len());
        match writer.write_tab(tab_name, &rows).await {
            Ok(()) => {}
            Err(e) if policy == WritePolicy::BestEffort => {
                error!("Continuing after write failure: {e}");
                first_error.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
