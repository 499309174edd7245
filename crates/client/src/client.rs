//! The chain client trait.

use std::time::Duration;

use alloy::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use sonora_primitives::{Rollup, SubmissionUnit};

use crate::{error::ClientError, types::{SendOpts, TxOutcome}};

/// Everything the publisher needs from the underlying chain.
///
/// Implementations are expected to be thread-safe collaborators; the
/// publisher holds one behind an `Arc` and never assumes exclusive access.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Packages a rollup into signable transaction byte sequences.
    ///
    /// Signatures whose on-chain approval flag is already set are omitted
    /// from the proof transaction.
    async fn build_batch(&self, rollup: &Rollup) -> Result<SubmissionUnit, ClientError>;

    /// Accounts available for signing. The default signer is the first entry.
    async fn accounts(&self) -> Result<Vec<Address>, ClientError>;

    /// Base fee of the most recently sealed block, in wei.
    async fn latest_base_fee(&self) -> Result<u128, ClientError>;

    /// Balance of `address` in wei.
    async fn balance(&self, address: Address) -> Result<U256, ClientError>;

    /// Next-to-use nonce of `address` at its latest state.
    async fn transaction_count(&self, address: Address) -> Result<u64, ClientError>;

    /// Sends a pre-encoded transaction payload.
    async fn send_transaction(&self, payload: &Bytes, opts: &SendOpts)
    -> Result<B256, ClientError>;

    /// Polls for a receipt until mined or `timeout` elapses.
    ///
    /// `Ok(None)` means the transaction did not mine within the budget.
    async fn receipt_with_timeout(
        &self,
        tx_hash: B256,
        timeout: Duration,
    ) -> Result<Option<TxOutcome>, ClientError>;

    /// Whether the on-chain approval flag is set for `(signer, tx_id)`.
    async fn proof_approval_status(
        &self,
        signer: Address,
        tx_id: B256,
    ) -> Result<bool, ClientError>;
}
