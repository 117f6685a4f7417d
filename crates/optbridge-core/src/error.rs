//! Error types for option synchronization.

/// Errors raised by a widget instance.
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("Option {path} rejected: {reason}")]
    Rejected { path: String, reason: String },

    #[error("Batch update error: {0}")]
    Batch(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors that can occur while synchronizing options.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("No widget instance bound to the options manager")]
    NoInstance,

    #[error(transparent)]
    Instance(#[from] InstanceError),
}
