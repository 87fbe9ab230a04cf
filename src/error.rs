//! Error types for the portfolio contact backend.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Persistence gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// The store never came up at startup; the process is running degraded.
    #[error("Store unavailable")]
    Unavailable,
}

/// Notification gateway errors.
///
/// A `NotifyError` after a successful insert is a partial success, not a
/// total failure — the pipeline reports it as a qualified outcome.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("SMTP transport not configured")]
    NotConfigured,

    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    Transport(String),
}

/// Remote classifier errors.
///
/// These never cross the pipeline boundary: the fallback decorator absorbs
/// them and degrades to the local denylist.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Classifier returned HTTP {0}")]
    Status(u16),

    #[error("Invalid classifier response: {0}")]
    Decode(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
