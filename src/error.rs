//! Error types for creator-dl
//!
//! Per-item failures inside a download run never surface as `Err`: they are recorded on the
//! queue item instead. The variants here cover what the caller can observe directly:
//! - input errors (empty selection, run already started)
//! - HTTP collaborator failures (network, non-success status, upstream `{ error }` bodies)
//! - export and filesystem failures

use thiserror::Error;

/// Result type alias for creator-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for creator-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.base_url")
        key: Option<String>,
    },

    /// Network error raised by the HTTP client
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Http {
        /// Status code returned by the backend
        status: u16,
        /// Request URL (query included)
        url: String,
    },

    /// The backend answered with an `{ "error": ... }` body
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A URL could not be built from the configured base
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A run was requested with nothing selected
    #[error("no videos selected")]
    EmptySelection,

    /// Operation not allowed in the current run state
    #[error("cannot {operation} while run is {state}")]
    InvalidState {
        /// The operation that was attempted (e.g., "start")
        operation: String,
        /// The state that prevents it (e.g., "running", "finished")
        state: String,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Machine-readable error code for presentation layers
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::Http { .. } => "http_error",
            Error::Upstream(_) => "upstream_error",
            Error::InvalidUrl(_) => "invalid_url",
            Error::Io(_) => "io_error",
            Error::Csv(_) => "csv_error",
            Error::Serialization(_) => "serialization_error",
            Error::EmptySelection => "empty_selection",
            Error::InvalidState { .. } => "invalid_state",
            Error::Other(_) => "internal_error",
        }
    }

    /// Whether the caller supplied bad input (as opposed to a collaborator failing)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::EmptySelection | Error::InvalidState { .. } | Error::Config { .. }
        )
    }
}
