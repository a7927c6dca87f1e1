mod api;
mod config;
mod dates;
mod error;
mod model;
mod report;
pub mod sync;

pub use api::Mode;
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use model::Amount;
