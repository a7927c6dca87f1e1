//! Implements the `SheetWriter` trait using the `sheets::Client` to interact
//! with a Google sheet.
//!
//! Tab contents are fully replaced on every write: clear the tab, then write
//! the new rows. Tabs that do not exist yet are created first. Structural
//! calls the `sheets` crate does not model (listing and adding tabs) go
//! through the Sheets REST API directly with the same bearer token.

use crate::api::{SheetWriter, TokenProvider};
use crate::error::{Error, Result};
use anyhow::Context;
use serde::Deserialize;
use sheets::types::{
    BatchClearValuesRequest, BatchUpdateValuesRequest, Dimension, ValueInputOption, ValueRange,
};
use tracing::{debug, trace};

pub(crate) struct GoogleSheet {
    sheet_id: String,
    token_provider: TokenProvider,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

impl GoogleSheet {
    pub(crate) fn new(sheet_id: impl Into<String>, token_provider: TokenProvider) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            token_provider,
            http: reqwest::Client::new(),
        }
    }

    /// Creates a values client with a fresh access token.
    async fn values_client(&mut self) -> Result<sheets::Client> {
        let access_token = self.token_provider.token_with_refresh().await?;
        // The sheets crate wants OAuth client fields, but with an access token
        // in hand only the token is needed for API calls.
        Ok(sheets::Client::new(
            String::new(),
            String::new(),
            String::new(),
            access_token.to_string(),
            String::new(),
        ))
    }

    /// Creates `tab_name` if the spreadsheet does not already have it.
    async fn ensure_tab(&mut self, tab_name: &str) -> Result<()> {
        let token = self.token_provider.token_with_refresh().await?.to_string();
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}?fields=sheets.properties.title",
            self.sheet_id
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .context("failed to fetch spreadsheet metadata")
            .map_err(|e| write_error(tab_name, e))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                service: "Google Sheets",
                message: format!("spreadsheet access denied ({})", response.status()),
            });
        }
        let meta = check_json::<SpreadsheetMeta>(response)
            .await
            .map_err(|e| write_error(tab_name, e))?;

        if meta.sheets.iter().any(|s| s.properties.title == tab_name) {
            trace!("Tab '{tab_name}' already exists");
            return Ok(());
        }

        debug!("Creating tab '{tab_name}'");
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}:batchUpdate",
            self.sheet_id
        );
        let add_sheet = async {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&token)
                .json(&serde_json::json!({
                    "requests": [{ "addSheet": { "properties": { "title": tab_name } } }]
                }))
                .send()
                .await
                .context("failed to send addSheet request")?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unable to read response body".to_string());
                anyhow::bail!("addSheet failed with status {status}: {body}");
            }
            Ok::<_, anyhow::Error>(())
        };
        add_sheet.await.map_err(|e| write_error(tab_name, e))
    }
}

#[async_trait::async_trait]
impl SheetWriter for GoogleSheet {
    async fn write_tab(&mut self, tab_name: &str, rows: &[Vec<String>]) -> Result<()> {
        trace!("write_tab for {tab_name}");
        self.ensure_tab(tab_name).await?;
        let client = self.values_client().await?;

        // Clear, then write the whole table from A1.
        let clear_request = BatchClearValuesRequest {
            ranges: vec![format!("'{tab_name}'!A:ZZ")],
        };
        client
            .spreadsheets()
            .values_batch_clear(&self.sheet_id, &clear_request)
            .await
            .map_err(client_error)
            .with_context(|| format!("failed to clear tab '{tab_name}'"))
            .map_err(|e| write_error(tab_name, e))?;

        let value_range = ValueRange {
            major_dimension: Some(Dimension::Rows),
            range: format!("'{tab_name}'!A1"),
            values: rows.to_vec(),
        };
        let write_request = BatchUpdateValuesRequest {
            data: vec![value_range],
            include_values_in_response: Some(false),
            response_date_time_render_option: None,
            response_value_render_option: None,
            value_input_option: Some(ValueInputOption::UserEntered),
        };
        client
            .spreadsheets()
            .values_batch_update(&self.sheet_id, &write_request)
            .await
            .map_err(client_error)
            .with_context(|| format!("failed to write tab '{tab_name}'"))
            .map_err(|e| write_error(tab_name, e))?;

        debug!("Wrote {} rows to tab '{tab_name}'", rows.len());
        Ok(())
    }
}

async fn check_json<T>(response: reqwest::Response) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_string());
        anyhow::bail!("request failed with status {status}: {body}");
    }
    response.json().await.context("failed to parse response")
}

fn client_error(e: sheets::ClientError) -> anyhow::Error {
    anyhow::anyhow!("sheets client error: {e}")
}

fn write_error(tab: &str, source: anyhow::Error) -> Error {
    Error::Write {
        tab: tab.to_string(),
        source,
    }
}
