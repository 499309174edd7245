//! Per-transaction dispatch status.

use alloy::primitives::{B256, Bytes};
use sonora_primitives::SubmissionUnit;

/// Dispatch progress of a single transaction in the batch.
///
/// The status list's order is fixed for the lifetime of a publish call:
/// broadcast transactions first in their original order, the rollup-proof
/// transaction last. Order encodes nonce assignment; the mutable fields
/// carry per-attempt progress across retry iterations.
#[derive(Clone, Debug)]
pub struct TxStatus {
    /// Human-readable name used in logs.
    pub name: String,
    /// Signable transaction payload.
    pub payload: Bytes,
    /// Hash assigned on the most recent successful send attempt.
    pub tx_hash: Option<B256>,
    /// Set once a successful receipt has been observed. A confirmed entry
    /// is never resubmitted within the same publish call.
    pub confirmed: bool,
}

impl TxStatus {
    /// Creates an unsent, unconfirmed status.
    pub fn new(name: impl Into<String>, payload: Bytes) -> Self {
        Self { name: name.into(), payload, tx_hash: None, confirmed: false }
    }
}

/// Builds the ordered status list for one publish attempt.
#[must_use]
pub fn batch_statuses(unit: &SubmissionUnit) -> Vec<TxStatus> {
    let mut statuses = Vec::with_capacity(unit.tx_count());
    for (i, data) in unit.broadcast_txs.iter().enumerate() {
        statuses.push(TxStatus::new(format!("broadcast-{i}"), data.clone()));
    }
    statuses.push(TxStatus::new("rollup-proof", unit.proof_tx.clone()));
    statuses
}
