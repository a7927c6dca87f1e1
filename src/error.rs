//! Error taxonomy for the sync pipeline.
//!
//! Every fatal error surfaces to `main` tagged with the stage that failed.
//! Collaborator failures carry an `anyhow::Error` source so the full cause
//! chain (HTTP status, response body, etc.) is preserved in the logs.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is missing or invalid. Raised before any network
    /// call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// One of the two collaborators rejected our credentials.
    #[error("authentication rejected by {service}: {message}")]
    Authentication {
        service: &'static str,
        message: String,
    },

    /// Failed to retrieve categories or transactions from the budget server.
    #[error("failed to fetch {what} from the budget server")]
    Fetch {
        what: String,
        #[source]
        source: anyhow::Error,
    },

    /// Failed to write a tab to the spreadsheet.
    #[error("failed to write tab '{tab}' to the spreadsheet")]
    Write {
        tab: String,
        #[source]
        source: anyhow::Error,
    },

    /// A wire amount was not an integer number of minor units.
    #[error("invalid amount: {0} is not an integer number of minor units")]
    InvalidAmount(String),
}
