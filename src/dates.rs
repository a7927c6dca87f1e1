//! Calendar-month windows and the transactions date-range selector.

use crate::error::{Error, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// First day, last day (inclusive), and display label for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// e.g. "January 2024".
    pub label: String,
}

impl MonthWindow {
    /// The calendar month containing `date`, shifted by `offset_months`
    /// (negative for past months).
    pub fn containing(date: NaiveDate, offset_months: i32) -> Self {
        let first_of_month = date.with_day(1).unwrap_or(date);
        let start = if offset_months >= 0 {
            first_of_month.checked_add_months(Months::new(offset_months as u32))
        } else {
            first_of_month.checked_sub_months(Months::new(offset_months.unsigned_abs()))
        }
        .unwrap_or(first_of_month);
        // Last day of the month is the day before the first of the next month.
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(start);
        let label = start.format("%B %Y").to_string();
        Self { start, end, label }
    }

    /// The month key used by the budget server, e.g. "2024-01".
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.start.year(), self.start.month())
    }
}

/// Which transactions to export, relative to the run date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    #[default]
    CurrentMonth,
    PreviousMonth,
    BothMonths,
}

impl DateRange {
    /// Resolves the selector to concrete month windows. `BothMonths` yields
    /// two disjoint windows, previous month first.
    pub fn windows(self, today: NaiveDate) -> Vec<MonthWindow> {
        match self {
            DateRange::CurrentMonth => vec![MonthWindow::containing(today, 0)],
            DateRange::PreviousMonth => vec![MonthWindow::containing(today, -1)],
            DateRange::BothMonths => vec![
                MonthWindow::containing(today, -1),
                MonthWindow::containing(today, 0),
            ],
        }
    }

    /// Title for the Transactions tab, combining labels when both months are
    /// selected, e.g. "Transactions - January 2024 to February 2024".
    pub fn tab_title(self, today: NaiveDate) -> String {
        let windows = self.windows(today);
        match windows.as_slice() {
            [only] => format!("Transactions - {}", only.label),
            [first, .., last] => format!("Transactions - {} to {}", first.label, last.label),
            [] => "Transactions".to_string(),
        }
    }
}

impl FromStr for DateRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        serde_plain::from_str(s).map_err(|_| {
            Error::Configuration(format!(
                "unknown transactions date range '{s}', expected one of \
                 current_month, previous_month, both_months"
            ))
        })
    }
}
