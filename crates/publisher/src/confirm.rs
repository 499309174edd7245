//! Receipt confirmation and failure classification.

use std::sync::Arc;

use sonora_client::ChainClient;

use crate::{config::PublisherConfig, interrupt::InterruptFlag, status::TxStatus};

/// Revert name that makes a publish unrecoverable: the rollup contract's
/// state advanced since this proof was built, so retrying the same payload
/// can never succeed. The next rollup must be rebuilt against the new chain
/// state, which is the coordinator's job.
pub const INCORRECT_STATE_HASH: &str = "INCORRECT_STATE_HASH";

/// Result of a confirmation pass over the batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Every entry in the batch holds a successful receipt.
    AllConfirmed,
    /// A transaction reverted for a reason that may be transient; the outer
    /// loop should resend the unconfirmed entries on fresh nonces.
    Retry,
    /// The publish cannot proceed: a receipt never arrived, the receipt
    /// fetch failed, the fatal revert was observed, or the interrupt fired.
    Abort,
}

/// Polls receipts for a dispatched batch, in dispatch order.
pub struct ReceiptConfirmer<C> {
    /// Chain client used for receipt queries.
    client: Arc<C>,
    /// Publisher configuration.
    config: PublisherConfig,
    /// Shared interrupt flag.
    interrupt: InterruptFlag,
}

impl<C> ReceiptConfirmer<C>
where
    C: ChainClient,
{
    /// Creates a new confirmer.
    pub fn new(client: Arc<C>, config: PublisherConfig, interrupt: InterruptFlag) -> Self {
        Self { client, config, interrupt }
    }

    /// Walks the batch in order, confirming each entry that is not yet
    /// confirmed.
    ///
    /// Classification, in priority order:
    /// 1. no receipt within the per-transaction budget, or the fetch itself
    ///    failed: [`ConfirmOutcome::Abort`];
    /// 2. receipt with the status bit set: the entry is marked confirmed;
    /// 3. receipt with the status bit clear and revert name
    ///    [`INCORRECT_STATE_HASH`]: [`ConfirmOutcome::Abort`];
    /// 4. any other failed receipt: [`ConfirmOutcome::Retry`], with the
    ///    entry left unconfirmed.
    pub async fn confirm(&self, statuses: &mut [TxStatus]) -> ConfirmOutcome {
        for status in statuses.iter_mut() {
            if status.confirmed {
                continue;
            }
            if self.interrupt.is_interrupted() {
                return ConfirmOutcome::Abort;
            }
            let Some(tx_hash) = status.tx_hash else {
                // The submitter never hands over an entry without a hash.
                tracing::error!(name = %status.name, "Entry has no hash to confirm, aborting");
                return ConfirmOutcome::Abort;
            };

            let outcome =
                match self.client.receipt_with_timeout(tx_hash, self.config.receipt_timeout).await
                {
                    Ok(Some(outcome)) => outcome,
                    Ok(None) => {
                        tracing::error!(
                            name = %status.name,
                            tx_hash = %tx_hash,
                            "No receipt within budget, aborting publish"
                        );
                        return ConfirmOutcome::Abort;
                    }
                    Err(e) => {
                        tracing::error!(
                            name = %status.name,
                            tx_hash = %tx_hash,
                            error = %e,
                            "Receipt fetch failed, aborting publish"
                        );
                        return ConfirmOutcome::Abort;
                    }
                };

            if outcome.success {
                tracing::debug!(name = %status.name, tx_hash = %tx_hash, "Transaction confirmed");
                status.confirmed = true;
                continue;
            }

            match outcome.revert {
                Some(reason) if reason.name == INCORRECT_STATE_HASH => {
                    tracing::error!(
                        name = %status.name,
                        revert = %reason.name,
                        params = ?reason.params,
                        "Rollup contract state advanced under us, aborting publish"
                    );
                    return ConfirmOutcome::Abort;
                }
                Some(reason) => {
                    tracing::warn!(
                        name = %status.name,
                        revert = %reason.name,
                        params = ?reason.params,
                        "Transaction reverted, scheduling resubmission"
                    );
                    return ConfirmOutcome::Retry;
                }
                None => {
                    tracing::warn!(
                        name = %status.name,
                        tx_hash = %tx_hash,
                        "Transaction reverted without a decoded reason, scheduling resubmission"
                    );
                    return ConfirmOutcome::Retry;
                }
            }
        }
        ConfirmOutcome::AllConfirmed
    }
}

impl<C> std::fmt::Debug for ReceiptConfirmer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptConfirmer").field("config", &self.config).finish_non_exhaustive()
    }
}
