//! Renders reports and transaction lists into spreadsheet rows.
//!
//! Output is a plain `Vec<Vec<String>>` ready for the spreadsheet collaborator:
//! a title row, a header row, the data rows with currency-formatted cells, and
//! (for budget reports) a final TOTAL row.

use crate::model::{MonthlyReport, TransactionRow};

pub const BUDGET_HEADERS: [&str; 5] = [
    "Group",
    "Category",
    "Budgeted",
    "Actual Spend",
    "Running Balance",
];

pub const TRANSACTION_HEADERS: [&str; 7] = [
    "Date",
    "Account",
    "Payee",
    "Category",
    "Description",
    "Amount",
    "Cleared",
];

const TOTAL_LABEL: &str = "TOTAL";
const CLEARED_MARK: &str = "✓";

fn title_row(title: &str, width: usize) -> Vec<String> {
    let mut row = vec![String::new(); width];
    row[0] = title.to_string();
    row
}

fn header_row(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| h.to_string()).collect()
}

/// Renders a monthly budget report as spreadsheet rows.
pub fn budget_rows(report: &MonthlyReport) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(report.rows.len() + 3);
    rows.push(title_row(&report.month_label, BUDGET_HEADERS.len()));
    rows.push(header_row(&BUDGET_HEADERS));
    for row in &report.rows {
        rows.push(vec![
            row.group_name.clone(),
            row.category_name.clone(),
            row.budgeted.to_string(),
            row.actual.to_string(),
            row.balance.to_string(),
        ]);
    }
    rows.push(vec![
        TOTAL_LABEL.to_string(),
        String::new(),
        report.totals.budgeted.to_string(),
        report.totals.actual.to_string(),
        report.totals.balance.to_string(),
    ]);
    rows
}

/// Renders a transaction list as spreadsheet rows, preserving input order.
pub fn transaction_rows(title: &str, transactions: &[TransactionRow]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(transactions.len() + 2);
    rows.push(title_row(title, TRANSACTION_HEADERS.len()));
    rows.push(header_row(&TRANSACTION_HEADERS));
    for tx in transactions {
        rows.push(vec![
            tx.date.format("%Y-%m-%d").to_string(),
            tx.account.clone(),
            tx.payee.clone(),
            tx.category.clone(),
            tx.description.clone(),
            tx.amount.to_string(),
            if tx.cleared {
                CLEARED_MARK.to_string()
            } else {
                String::new()
            },
        ]);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, CategoryRecord};
    use crate::report::monthly_report;
    use chrono::NaiveDate;

    fn example_report() -> MonthlyReport {
        let records = vec![
            CategoryRecord::new(
                "c1",
                "Electric",
                Some("Bills".to_string()),
                Amount::from_minor_units(15000),
                Amount::from_minor_units(14532),
            ),
            CategoryRecord::new(
                "c2",
                "Water",
                Some("Bills".to_string()),
                Amount::from_minor_units(5000),
                Amount::from_minor_units(4820),
            ),
            CategoryRecord::new(
                "c3",
                "Groceries",
                Some("Food".to_string()),
                Amount::from_minor_units(50000),
                Amount::from_minor_units(52345),
            ),
            CategoryRecord::new(
                "c4",
                "Dining",
                Some("Food".to_string()),
                Amount::from_minor_units(20000),
                Amount::from_minor_units(18967),
            ),
        ];
        monthly_report(records, "January 2024")
    }

    #[test]
    fn test_budget_rows_worked_example() {
        let rows = budget_rows(&example_report());
        let expected: Vec<Vec<&str>> = vec![
            vec!["January 2024", "", "", "", ""],
            vec!["Group", "Category", "Budgeted", "Actual Spend", "Running Balance"],
            vec!["Bills", "Electric", "$150.00", "$145.32", "$4.68"],
            vec!["Bills", "Water", "$50.00", "$48.20", "$1.80"],
            vec!["Food", "Dining", "$200.00", "$189.67", "$10.33"],
            vec!["Food", "Groceries", "$500.00", "$523.45", "-$23.45"],
            vec!["TOTAL", "", "$900.00", "$906.64", "-$6.64"],
        ];
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_budget_rows_empty_report() {
        let rows = budget_rows(&MonthlyReport::empty("March 2024"));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "March 2024");
        assert_eq!(
            rows[2],
            vec!["TOTAL", "", "$0.00", "$0.00", "$0.00"]
        );
    }

    #[test]
    fn test_transaction_rows() {
        let transactions = vec![
            TransactionRow {
                date: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
                account: "Checking".to_string(),
                payee: "City Power".to_string(),
                category: "Electric".to_string(),
                description: "monthly bill".to_string(),
                amount: Amount::from_minor_units(-14532),
                cleared: true,
            },
            TransactionRow {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                account: "Checking".to_string(),
                payee: String::new(),
                category: "Uncategorized".to_string(),
                description: String::new(),
                amount: Amount::from_minor_units(250000),
                cleared: false,
            },
        ];
        let rows = transaction_rows("Transactions - January 2024", &transactions);
        assert_eq!(rows[0][0], "Transactions - January 2024");
        assert_eq!(rows[1], TRANSACTION_HEADERS.map(str::to_string).to_vec());
        assert_eq!(
            rows[2],
            vec![
                "2024-01-16",
                "Checking",
                "City Power",
                "Electric",
                "monthly bill",
                "-$145.32",
                "✓"
            ]
        );
        assert_eq!(rows[3][5], "$2,500.00");
        assert_eq!(rows[3][6], "");
    }
}
