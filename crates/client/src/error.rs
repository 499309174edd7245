//! Chain client error types.

use thiserror::Error;

/// Chain client errors.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// RPC error.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Latest block carries no base fee.
    #[error("Latest block has no base fee")]
    MissingBaseFee,

    /// The node exposes no accounts to sign with.
    #[error("Chain client has no accounts")]
    NoAccounts,

    /// Transaction submission failed.
    #[error("Failed to send transaction: {0}")]
    Send(String),

    /// Batch encoding failed.
    #[error("Batch encoding failed: {0}")]
    Codec(String),
}

impl ClientError {
    /// Returns true if the error is plausibly transient and worth retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Rpc(_) | Self::Send(_))
    }
}
