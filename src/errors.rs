//! Error types shared across the crate.
//!
//! Provider-originated failures are caught at the delegated SDK call and
//! re-raised as the matching variant, carrying the provider's diagnostic
//! text. No retries happen anywhere in this crate; retry policy belongs to
//! the SDK or the caller.

use thiserror::Error;

/// Errors produced by the upload broker.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Invalid settings detected while building [`crate::config::BrokerConfig`].
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Caller input violated a precondition checked locally, before any
    /// provider call was made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The provider rejected the creation of a multipart upload.
    #[error("failed to initiate multipart upload: {0}")]
    Initiation(String),

    /// The provider rejected a presign, completion, abort, or listing call.
    #[error("upload operation failed: {0}")]
    Upload(String),

    /// The provider rejected a delete-object call.
    #[error("failed to delete object: {0}")]
    Delete(String),
}

impl BrokerError {
    /// Shortcut for a local validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Shortcut for a configuration failure.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type BrokerResult<T> = Result<T, BrokerError>;
