//! Ordered batch submission.

use std::sync::Arc;

use sonora_client::{ChainClient, SendOpts};

use crate::{config::PublisherConfig, interrupt::InterruptFlag, status::TxStatus};

/// Result of a batch submission pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every unconfirmed entry obtained a transaction hash.
    Dispatched,
    /// The interrupt flag was raised before the batch was fully dispatched.
    Interrupted,
}

/// Dispatches a status list in order on a contiguous run of nonces.
///
/// Broadcast transactions always precede the rollup-proof transaction and
/// hold strictly lower nonces, so the proof cannot mine before the data it
/// references is propagating.
pub struct BatchSubmitter<C> {
    /// Chain client used for sends.
    client: Arc<C>,
    /// Publisher configuration.
    config: PublisherConfig,
    /// Shared interrupt flag.
    interrupt: InterruptFlag,
}

impl<C> BatchSubmitter<C>
where
    C: ChainClient,
{
    /// Creates a new submitter.
    pub fn new(client: Arc<C>, config: PublisherConfig, interrupt: InterruptFlag) -> Self {
        Self { client, config, interrupt }
    }

    /// Sends every unconfirmed entry in list order, assigning nonces from
    /// `start_nonce`.
    ///
    /// Confirmed entries are skipped and do not consume a nonce. A failed
    /// send is retried on the same nonce after a cancellable pause; the walk
    /// never advances past an entry until it holds a hash. Entries that are
    /// unconfirmed but carry a hash from an earlier iteration are resent and
    /// their hash overwritten.
    pub async fn submit(&self, statuses: &mut [TxStatus], start_nonce: u64) -> SubmitOutcome {
        let mut nonce = start_nonce;
        for status in statuses.iter_mut() {
            if status.confirmed {
                continue;
            }
            let opts = SendOpts {
                nonce,
                gas_limit: self.config.gas_limit,
                max_fee_per_gas: self.config.max_fee_per_gas,
                max_priority_fee_per_gas: self.config.max_priority_fee_per_gas,
            };
            loop {
                if self.interrupt.is_interrupted() {
                    return SubmitOutcome::Interrupted;
                }
                match self.client.send_transaction(&status.payload, &opts).await {
                    Ok(tx_hash) => {
                        tracing::info!(
                            name = %status.name,
                            size = status.payload.len(),
                            nonce,
                            tx_hash = %tx_hash,
                            "Transaction sent"
                        );
                        status.tx_hash = Some(tx_hash);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(
                            name = %status.name,
                            nonce,
                            error = %e,
                            "Send failed, retrying on the same nonce"
                        );
                        if self.interrupt.sleep_or_interrupted(self.config.retry_interval).await {
                            return SubmitOutcome::Interrupted;
                        }
                    }
                }
            }
            nonce += 1;
        }
        SubmitOutcome::Dispatched
    }
}

impl<C> std::fmt::Debug for BatchSubmitter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchSubmitter").field("config", &self.config).finish_non_exhaustive()
    }
}
