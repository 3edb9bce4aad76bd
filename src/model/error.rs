//! Errors raised while assembling a collection snapshot

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Collection payload could not be decoded
    #[error("Invalid collection payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}
