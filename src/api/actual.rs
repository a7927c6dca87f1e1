//! Implements the `BudgetSource` trait against an Actual Budget server.
//!
//! Session lifecycle: `open` authenticates with the server password and
//! resolves the configured budget file, data calls carry the session token in
//! the `X-ACTUAL-TOKEN` header, and `close` releases the session handle. The
//! session is always an explicitly passed value, never process-wide state.

use crate::api::BudgetSource;
use crate::error::{Error, Result};
use crate::model::{Amount, CategoryRecord, TransactionRow};
use crate::Config;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

const TOKEN_HEADER: &str = "X-ACTUAL-TOKEN";
const ENCRYPTION_HEADER: &str = "X-ACTUAL-ENCRYPTION-PASSWORD";

pub(crate) struct ActualSession {
    base_url: String,
    http: reqwest::Client,
    token: String,
    file_id: String,
    encryption_password: Option<String>,
}

#[derive(Deserialize)]
struct LoginResponse {
    data: LoginData,
}

#[derive(Deserialize)]
struct LoginData {
    token: String,
}

#[derive(Deserialize)]
struct UserFilesResponse {
    data: Vec<UserFile>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserFile {
    file_id: String,
    name: String,
    #[serde(default)]
    deleted: bool,
}

/// One category of the server's budget-month report, amounts in minor units.
#[derive(Debug, Deserialize)]
struct WireCategory {
    id: String,
    name: Option<String>,
    group: Option<String>,
    budgeted: Option<serde_json::Number>,
    spent: Option<serde_json::Number>,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    tombstone: bool,
}

/// One transaction record as the server stores it: the date is an integer
/// `YYYYMMDD` and the amount is in minor units.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTransaction {
    date: i64,
    account: Option<String>,
    payee: Option<String>,
    category: Option<String>,
    notes: Option<String>,
    amount: serde_json::Number,
    #[serde(default)]
    cleared: bool,
    #[serde(default)]
    is_parent: bool,
    #[serde(default)]
    tombstone: bool,
}

impl ActualSession {
    /// Authenticates with the server and resolves the configured budget file.
    pub(crate) async fn open(config: &Config) -> Result<Self> {
        let base_url = config.server_url().as_str().trim_end_matches('/').to_string();
        let http = reqwest::Client::new();
        debug!("Opening session with Actual server at {base_url}");

        let token = login(&http, &base_url, config.password()).await?;
        let file_id = resolve_file(&http, &base_url, &token, config.file_name()).await?;
        debug!("Resolved budget file '{}' to {file_id}", config.file_name());

        Ok(Self {
            base_url,
            http,
            token,
            file_id,
            encryption_password: config.encryption_password().map(str::to_string),
        })
    }

    async fn get_json<T>(&self, url: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut request = self.http.get(url).header(TOKEN_HEADER, &self.token);
        if let Some(password) = &self.encryption_password {
            request = request.header(ENCRYPTION_HEADER, password);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("failed to parse response from {url}"))
    }
}

#[async_trait::async_trait]
impl BudgetSource for ActualSession {
    async fn categories(&mut self, month_key: &str) -> Result<Vec<CategoryRecord>> {
        let url = format!(
            "{}/api/budgets/{}/months/{month_key}/categories",
            self.base_url, self.file_id
        );
        let wire: Vec<WireCategory> = self.get_json(&url).await.map_err(|e| Error::Fetch {
            what: format!("categories for {month_key}"),
            source: e,
        })?;
        debug!("Fetched {} category records for {month_key}", wire.len());
        category_records(wire)
    }

    async fn transactions(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionRow>> {
        let url = format!(
            "{}/api/budgets/{}/transactions?start_date={start}&end_date={end}",
            self.base_url, self.file_id
        );
        let wire: Vec<WireTransaction> = self.get_json(&url).await.map_err(|e| Error::Fetch {
            what: format!("transactions from {start} to {end}"),
            source: e,
        })?;
        debug!("Fetched {} transaction records", wire.len());
        transaction_rows(wire, start, end)
    }

    async fn close(&mut self) {
        // The server session expires on its own; dropping the token here is
        // the release half of the scoped acquisition.
        debug!("Closing session with Actual server at {}", self.base_url);
        self.token.clear();
    }
}

async fn login(http: &reqwest::Client, base_url: &str, password: &str) -> Result<String> {
    let url = format!("{base_url}/account/login");
    let response = http
        .post(&url)
        .json(&serde_json::json!({
            "loginMethod": "password",
            "password": password,
        }))
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))
        .map_err(|e| Error::Fetch {
            what: "login session".to_string(),
            source: e,
        })?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED
        || response.status() == reqwest::StatusCode::FORBIDDEN
    {
        return Err(Error::Authentication {
            service: "Actual Budget",
            message: "server rejected the password".to_string(),
        });
    }

    let parse = async {
        let response = check_status(response).await?;
        let login: LoginResponse = response
            .json()
            .await
            .context("failed to parse login response")?;
        Ok::<_, anyhow::Error>(login.data.token)
    };
    parse.await.map_err(|e| Error::Fetch {
        what: "login session".to_string(),
        source: e,
    })
}

async fn resolve_file(
    http: &reqwest::Client,
    base_url: &str,
    token: &str,
    file_name: &str,
) -> Result<String> {
    let url = format!("{base_url}/sync/list-user-files");
    let fetch = async {
        let response = http
            .get(&url)
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        let response = check_status(response).await?;
        let files: UserFilesResponse = response
            .json()
            .await
            .context("failed to parse user file list")?;
        Ok::<_, anyhow::Error>(files.data)
    };
    let files = fetch.await.map_err(|e| Error::Fetch {
        what: "budget file list".to_string(),
        source: e,
    })?;

    files
        .into_iter()
        .filter(|f| !f.deleted)
        .find(|f| f.name == file_name)
        .map(|f| f.file_id)
        .ok_or_else(|| {
            Error::Configuration(format!("budget file '{file_name}' not found on the server"))
        })
}

async fn check_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());
    bail!("server returned {status}: {body}");
}

/// Converts wire categories to validated records, skipping hidden and deleted
/// entries. Missing amounts default to zero; non-integer amounts are invalid.
fn category_records(wire: Vec<WireCategory>) -> Result<Vec<CategoryRecord>> {
    wire.into_iter()
        .filter(|c| !c.hidden && !c.tombstone)
        .map(|c| {
            let budgeted = amount_or_zero(c.budgeted.as_ref())?;
            let spent = amount_or_zero(c.spent.as_ref())?;
            Ok(CategoryRecord::new(
                c.id,
                c.name.unwrap_or_default(),
                c.group,
                budgeted,
                spent,
            ))
        })
        .collect()
}

fn amount_or_zero(number: Option<&serde_json::Number>) -> Result<Amount> {
    match number {
        Some(n) => Amount::from_json_number(n),
        None => Ok(Amount::ZERO),
    }
}

/// Converts wire transactions to display rows: parent split records and
/// deleted records are skipped, rows outside `[start, end]` are filtered out,
/// and the result is sorted date-descending (most recent first).
fn transaction_rows(
    wire: Vec<WireTransaction>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<TransactionRow>> {
    let mut rows = Vec::with_capacity(wire.len());
    for tx in wire {
        if tx.is_parent || tx.tombstone {
            continue;
        }
        let Some(date) = parse_yyyymmdd(tx.date) else {
            warn!("Skipping transaction with unparseable date {}", tx.date);
            continue;
        };
        if date < start || date > end {
            continue;
        }
        rows.push(TransactionRow {
            date,
            account: tx.account.unwrap_or_else(|| "Unknown".to_string()),
            payee: tx.payee.unwrap_or_default(),
            category: tx.category.unwrap_or_else(|| "Uncategorized".to_string()),
            description: tx.notes.unwrap_or_default(),
            amount: Amount::from_json_number(&tx.amount)?,
            cleared: tx.cleared,
        });
    }
    // Stable sort keeps the server's order for same-day transactions.
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(rows)
}

/// Actual stores dates as integers like `20240116`.
fn parse_yyyymmdd(value: i64) -> Option<NaiveDate> {
    let year = i32::try_from(value / 10_000).ok()?;
    let month = u32::try_from((value / 100) % 100).ok()?;
    let day = u32::try_from(value % 100).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
