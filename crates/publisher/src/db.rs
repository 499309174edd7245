//! Rollup database seam.

use std::collections::HashMap;

use alloy::primitives::{B256, Bytes};
use async_trait::async_trait;
use sonora_primitives::RollupId;
use thiserror::Error;
use tokio::sync::Mutex;

/// Rollup database errors.
#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// Underlying storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Progress persistence for in-flight rollups.
///
/// The proof payload is persisted before any on-chain attempt so a
/// restarting process can reconstruct what was meant to be published; the
/// final transaction hash is persisted after each full dispatch so a
/// restarting process can locate the pending batch.
#[async_trait]
pub trait RollupDb: Send + Sync {
    /// Persists the built proof transaction payload for `id`.
    async fn set_call_data(&self, id: RollupId, call_data: &Bytes) -> Result<(), DbError>;

    /// Persists the hash of the final (rollup-proof) transaction for `id`.
    async fn confirm_sent(&self, id: RollupId, tx_hash: B256) -> Result<(), DbError>;
}

/// Persisted state for one rollup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollupRecord {
    /// Proof transaction payload, written before submission.
    pub call_data: Option<Bytes>,
    /// Hash of the final transaction, written after full dispatch.
    pub sent_tx_hash: Option<B256>,
}

/// In-memory database used by tests and light deployments.
#[derive(Debug, Default)]
pub struct InMemoryRollupDb {
    entries: Mutex<HashMap<RollupId, RollupRecord>>,
}

impl InMemoryRollupDb {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored record for `id`, if any.
    pub async fn record(&self, id: RollupId) -> Option<RollupRecord> {
        self.entries.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl RollupDb for InMemoryRollupDb {
    async fn set_call_data(&self, id: RollupId, call_data: &Bytes) -> Result<(), DbError> {
        let mut entries = self.entries.lock().await;
        entries.entry(id).or_default().call_data = Some(call_data.clone());
        Ok(())
    }

    async fn confirm_sent(&self, id: RollupId, tx_hash: B256) -> Result<(), DbError> {
        let mut entries = self.entries.lock().await;
        entries.entry(id).or_default().sent_tx_hash = Some(tx_hash);
        Ok(())
    }
}
