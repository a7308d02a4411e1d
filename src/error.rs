/// Error types for the aggregation engine.
///
/// Every variant is fatal for the aggregation it came from: there is no
/// partial result and no skipping of bad rows.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    /// The document is not a chat export (wrong shape, wrong types, wrong file kind).
    #[error("Invalid input format: {reason}")]
    InvalidInputFormat {
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A record date does not match `YYYY-MM-DDTHH:MM:SS`.
    #[error("Malformed timestamp: '{value}'")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The export contains no message records.
    #[error("The export contains no messages")]
    EmptyMessageSet,

    #[error("Failed to read export file: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StatsError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        StatsError::InvalidInputFormat {
            reason: reason.into(),
            source: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
