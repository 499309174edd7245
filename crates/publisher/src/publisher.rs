//! Rollup publisher orchestration.

use std::sync::Arc;

use sonora_client::ChainClient;
use sonora_primitives::{Rollup, format_gwei};

use crate::{
    config::PublisherConfig,
    confirm::{ConfirmOutcome, ReceiptConfirmer},
    db::RollupDb,
    gate::{FeeGate, GateOutcome},
    interrupt::InterruptFlag,
    metrics::{PublishTimer, PublisherMetrics},
    status::batch_statuses,
    submit::{BatchSubmitter, SubmitOutcome},
};

/// Outcome of a publish call.
///
/// The publisher never surfaces errors to its caller; detailed causes go to
/// the log, and the caller decides whether to retry the same rollup or
/// rebuild it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Every transaction in the batch confirmed on-chain.
    Published,
    /// The publish was interrupted or hit an unrecoverable condition.
    Aborted,
}

/// Publishes locally-aggregated rollups as ordered L1 transaction batches.
///
/// One publish call is active at a time per instance; the surrounding
/// coordinator guarantees serial invocation. The interrupt flag is
/// process-long: [`interrupt`](Self::interrupt) makes the in-progress
/// publish (and every subsequent one) return
/// [`PublishOutcome::Aborted`] until [`clear_interrupt`](Self::clear_interrupt).
pub struct RollupPublisher<C, D> {
    client: Arc<C>,
    db: Arc<D>,
    config: PublisherConfig,
    interrupt: InterruptFlag,
    gate: FeeGate<C>,
    submitter: BatchSubmitter<C>,
    confirmer: ReceiptConfirmer<C>,
    metrics: PublisherMetrics,
}

impl<C, D> RollupPublisher<C, D>
where
    C: ChainClient,
    D: RollupDb,
{
    /// Creates a publisher over the given chain client and rollup database.
    pub fn new(client: Arc<C>, db: Arc<D>, config: PublisherConfig) -> Self {
        let interrupt = InterruptFlag::new();
        let gate = FeeGate::new(client.clone(), config.clone(), interrupt.clone());
        let submitter = BatchSubmitter::new(client.clone(), config.clone(), interrupt.clone());
        let confirmer = ReceiptConfirmer::new(client.clone(), config.clone(), interrupt.clone());
        Self {
            client,
            db,
            config,
            interrupt,
            gate,
            submitter,
            confirmer,
            metrics: PublisherMetrics::new(),
        }
    }

    /// Signals the in-progress publish to unwind as soon as possible.
    /// Idempotent; stays raised until [`clear_interrupt`](Self::clear_interrupt).
    pub fn interrupt(&self) {
        self.interrupt.interrupt();
    }

    /// Lowers the interrupt flag so the next publish can proceed.
    pub fn clear_interrupt(&self) {
        self.interrupt.clear();
    }

    /// A cloneable handle the coordinator can use to interrupt from another
    /// task.
    #[must_use]
    pub fn interrupt_handle(&self) -> InterruptFlag {
        self.interrupt.clone()
    }

    /// Returns the publisher metrics.
    #[must_use]
    pub const fn metrics(&self) -> &PublisherMetrics {
        &self.metrics
    }

    /// Returns the publisher configuration.
    #[must_use]
    pub const fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Publishes one rollup as an ordered batch of L1 transactions.
    ///
    /// `estimated_gas` sizes the balance requirement in the gate; each
    /// individual send carries the configured uniform gas limit.
    ///
    /// The outer loop gates on fees and balance, dispatches every
    /// unconfirmed transaction on a contiguous nonce run, and confirms
    /// receipts in order. Transient failures retry after a cancellable
    /// pause without resending confirmed transactions; unrecoverable
    /// conditions and interrupts unwind to [`PublishOutcome::Aborted`].
    pub async fn publish(&mut self, rollup: &Rollup, estimated_gas: u64) -> PublishOutcome {
        if self.interrupt.is_interrupted() {
            tracing::warn!(rollup = %rollup.id, "Interrupt raised, refusing to publish");
            self.metrics.record_aborted();
            return PublishOutcome::Aborted;
        }
        let timer = PublishTimer::start();

        let unit = match self.client.build_batch(rollup).await {
            Ok(unit) => unit,
            Err(e) => {
                tracing::error!(rollup = %rollup.id, error = %e, "Failed to build submission unit");
                self.metrics.record_aborted();
                return PublishOutcome::Aborted;
            }
        };

        // Persisted before any on-chain attempt so a restarting process can
        // reconstruct what was meant to be published.
        if let Err(e) = self.db.set_call_data(rollup.id, &unit.proof_tx).await {
            tracing::error!(rollup = %rollup.id, error = %e, "Failed to persist call data");
            self.metrics.record_aborted();
            return PublishOutcome::Aborted;
        }

        let mut statuses = batch_statuses(&unit);

        let signer = match self.client.accounts().await {
            Ok(accounts) => match accounts.first().copied() {
                Some(signer) => signer,
                None => {
                    tracing::error!(rollup = %rollup.id, "Chain client exposes no accounts");
                    self.metrics.record_aborted();
                    return PublishOutcome::Aborted;
                }
            },
            Err(e) => {
                tracing::error!(rollup = %rollup.id, error = %e, "Failed to read signer accounts");
                self.metrics.record_aborted();
                return PublishOutcome::Aborted;
            }
        };

        tracing::info!(
            rollup = %rollup.id,
            signer = %signer,
            txs = statuses.len(),
            max_fee = %format_gwei(self.config.max_fee_per_gas),
            priority_fee = %format_gwei(self.config.max_priority_fee_per_gas),
            "Publishing rollup"
        );

        loop {
            if self.interrupt.is_interrupted() {
                self.metrics.record_aborted();
                return PublishOutcome::Aborted;
            }

            if self.gate.await_clear(signer, estimated_gas).await == GateOutcome::Interrupted {
                self.metrics.record_aborted();
                return PublishOutcome::Aborted;
            }

            let start_nonce = match self.client.transaction_count(signer).await {
                Ok(nonce) => nonce,
                Err(e) => {
                    tracing::warn!(rollup = %rollup.id, error = %e, "Nonce fetch failed, retrying");
                    if self.interrupt.sleep_or_interrupted(self.config.retry_interval).await {
                        self.metrics.record_aborted();
                        return PublishOutcome::Aborted;
                    }
                    continue;
                }
            };

            let pending = statuses.iter().filter(|s| !s.confirmed).count() as u64;
            if self.submitter.submit(&mut statuses, start_nonce).await == SubmitOutcome::Interrupted
            {
                self.metrics.record_aborted();
                return PublishOutcome::Aborted;
            }
            self.metrics.record_sends(pending);

            // The rollup-proof transaction is last in the batch; its hash is
            // the one a restarting process needs to locate the batch.
            if let Some(tx_hash) = statuses.last().and_then(|s| s.tx_hash) {
                if let Err(e) = self.db.confirm_sent(rollup.id, tx_hash).await {
                    tracing::error!(rollup = %rollup.id, error = %e, "Failed to persist sent marker");
                    self.metrics.record_aborted();
                    return PublishOutcome::Aborted;
                }
            }

            match self.confirmer.confirm(&mut statuses).await {
                ConfirmOutcome::AllConfirmed => {
                    self.metrics.record_published(timer.elapsed());
                    tracing::info!(rollup = %rollup.id, "Rollup published");
                    return PublishOutcome::Published;
                }
                ConfirmOutcome::Retry => {
                    self.metrics.record_retry();
                    if self.interrupt.sleep_or_interrupted(self.config.retry_interval).await {
                        self.metrics.record_aborted();
                        return PublishOutcome::Aborted;
                    }
                }
                ConfirmOutcome::Abort => {
                    self.metrics.record_aborted();
                    return PublishOutcome::Aborted;
                }
            }
        }
    }
}

impl<C, D> std::fmt::Debug for RollupPublisher<C, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollupPublisher")
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
