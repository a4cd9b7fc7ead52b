//! Data loading for the scored-match feed and the bet ledger

pub mod feed;
pub mod ledger;

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

// Re-export commonly used types
pub use feed::{load_scored_feed, FeedColumns};
pub use ledger::{load_ledger, resolve_pending, save_ledger};

/// Loader errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] PolarsError),

    #[error("invalid ledger JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),
}
