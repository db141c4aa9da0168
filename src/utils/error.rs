use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// Nothing in the poll loop is fatal: `InvalidTcin` is reported to the caller
/// of add-product, `ProbeFailed`/`Http` mean the product is skipped for the
/// cycle, and `Delivery` is logged per sink and swallowed by the dispatcher.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not extract a TCIN from URL: {url}")]
    InvalidTcin { url: String },

    #[error("Probe request failed with status {status}")]
    ProbeFailed { status: u16 },

    #[error("Notification delivery failed ({sink}): {message}")]
    Delivery { sink: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
