use thiserror::Error;

/// ipotrack error types
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Source fetch failed (network, timeout, non-2xx)
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Failed to parse scraped or stored data
    #[error("parse error: {0}")]
    Parse(String),

    /// Listing store operation failed
    #[error("store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Admin payload rejected
    #[error("validation error: {0}")]
    Validation(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ipotrack
pub type Result<T> = std::result::Result<T, TrackerError>;
