//! Pre-flight fee and balance gating.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use sonora_client::ChainClient;
use sonora_primitives::{format_eth, format_gwei};

use crate::{config::PublisherConfig, interrupt::InterruptFlag};

/// Result of waiting on the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// Fee and balance conditions both hold; submission may proceed.
    Clear,
    /// The interrupt flag was raised while waiting.
    Interrupted,
}

/// Blocks publication while gas is too expensive or the signer underfunded.
///
/// The fee ceiling is an operator-set safety bound, not an auction input:
/// a predicted effective fee above it would either be refused by the node
/// or stick in the mempool. The balance is sized against the ceiling rather
/// than the prediction so a mid-batch fee spike cannot strand a partially
/// submitted batch.
pub struct FeeGate<C> {
    /// Chain client for base fee and balance queries.
    client: Arc<C>,
    /// Publisher configuration.
    config: PublisherConfig,
    /// Shared interrupt flag.
    interrupt: InterruptFlag,
}

impl<C> FeeGate<C>
where
    C: ChainClient,
{
    /// Creates a new gate.
    pub fn new(client: Arc<C>, config: PublisherConfig, interrupt: InterruptFlag) -> Self {
        Self { client, config, interrupt }
    }

    /// Blocks until both gate conditions hold or the interrupt is raised.
    ///
    /// Conditions, checked against freshly fetched chain state every round:
    /// - fee: `base_fee + max_priority_fee_per_gas <= max_fee_per_gas`
    /// - balance: `balance >= max_fee_per_gas * estimated_gas`
    ///
    /// Chain query failures are treated as transient and retried after the
    /// configured pause.
    pub async fn await_clear(&self, signer: Address, estimated_gas: u64) -> GateOutcome {
        loop {
            if self.interrupt.is_interrupted() {
                return GateOutcome::Interrupted;
            }
            match self.check(signer, estimated_gas).await {
                Ok(true) => return GateOutcome::Clear,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Gate chain query failed, retrying");
                }
            }
            if self.interrupt.sleep_or_interrupted(self.config.retry_interval).await {
                return GateOutcome::Interrupted;
            }
        }
    }

    async fn check(
        &self,
        signer: Address,
        estimated_gas: u64,
    ) -> Result<bool, sonora_client::ClientError> {
        let base_fee = self.client.latest_base_fee().await?;
        let balance = self.client.balance(signer).await?;

        let predicted = base_fee + self.config.max_priority_fee_per_gas;
        if predicted > self.config.max_fee_per_gas {
            tracing::info!(
                base_fee = %format_gwei(base_fee),
                predicted = %format_gwei(predicted),
                ceiling = %format_gwei(self.config.max_fee_per_gas),
                "Predicted fee above ceiling, waiting for cheaper gas"
            );
            return Ok(false);
        }

        let required = U256::from(self.config.max_fee_per_gas) * U256::from(estimated_gas);
        if balance < required {
            tracing::info!(
                signer = %signer,
                balance = %format_eth(balance),
                required = %format_eth(required),
                "Signer balance below worst-case spend, waiting for funds"
            );
            return Ok(false);
        }

        Ok(true)
    }
}

impl<C> std::fmt::Debug for FeeGate<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeGate").field("config", &self.config).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::Mutex,
        time::{Duration, Instant},
    };

    use alloy::primitives::{B256, Bytes};
    use async_trait::async_trait;
    use sonora_client::{ClientError, SendOpts, TxOutcome};
    use sonora_primitives::{Rollup, SubmissionUnit};

    use super::*;

    const GWEI: u128 = 1_000_000_000;

    /// Chain client with scripted base fees and balances; the last script
    /// entry repeats once the script runs dry.
    struct ScriptedChain {
        base_fees: Mutex<VecDeque<u128>>,
        balances: Mutex<VecDeque<U256>>,
        fee_polls: Mutex<u64>,
    }

    impl ScriptedChain {
        fn new(base_fees: Vec<u128>, balances: Vec<U256>) -> Self {
            Self {
                base_fees: Mutex::new(base_fees.into()),
                balances: Mutex::new(balances.into()),
                fee_polls: Mutex::new(0),
            }
        }

        fn fee_polls(&self) -> u64 {
            *self.fee_polls.lock().unwrap()
        }

        fn next(queue: &Mutex<VecDeque<u128>>) -> u128 {
            let mut queue = queue.lock().unwrap();
            if queue.len() > 1 { queue.pop_front().unwrap() } else { *queue.front().unwrap() }
        }
    }

    #[async_trait]
    impl ChainClient for ScriptedChain {
        async fn build_batch(&self, _rollup: &Rollup) -> Result<SubmissionUnit, ClientError> {
            unimplemented!("not used by the gate")
        }

        async fn accounts(&self) -> Result<Vec<Address>, ClientError> {
            unimplemented!("not used by the gate")
        }

        async fn latest_base_fee(&self) -> Result<u128, ClientError> {
            *self.fee_polls.lock().unwrap() += 1;
            Ok(Self::next(&self.base_fees))
        }

        async fn balance(&self, _address: Address) -> Result<U256, ClientError> {
            let mut queue = self.balances.lock().unwrap();
            let value =
                if queue.len() > 1 { queue.pop_front().unwrap() } else { *queue.front().unwrap() };
            Ok(value)
        }

        async fn transaction_count(&self, _address: Address) -> Result<u64, ClientError> {
            unimplemented!("not used by the gate")
        }

        async fn send_transaction(
            &self,
            _payload: &Bytes,
            _opts: &SendOpts,
        ) -> Result<B256, ClientError> {
            unimplemented!("not used by the gate")
        }

        async fn receipt_with_timeout(
            &self,
            _tx_hash: B256,
            _timeout: Duration,
        ) -> Result<Option<TxOutcome>, ClientError> {
            unimplemented!("not used by the gate")
        }

        async fn proof_approval_status(
            &self,
            _signer: Address,
            _tx_id: B256,
        ) -> Result<bool, ClientError> {
            unimplemented!("not used by the gate")
        }
    }

    fn test_config() -> PublisherConfig {
        PublisherConfig::builder()
            .max_fee_per_gas(50 * GWEI)
            .max_priority_fee_per_gas(2 * GWEI)
            .retry_interval(Duration::from_millis(5))
            .build()
    }

    fn gate(chain: Arc<ScriptedChain>) -> FeeGate<ScriptedChain> {
        FeeGate::new(chain, test_config(), InterruptFlag::new())
    }

    #[tokio::test]
    async fn clears_immediately_when_conditions_hold() {
        let chain =
            Arc::new(ScriptedChain::new(vec![20 * GWEI], vec![U256::from(10u128.pow(19))]));
        let outcome = gate(chain.clone()).await_clear(Address::ZERO, 1_000_000).await;

        assert_eq!(outcome, GateOutcome::Clear);
        assert_eq!(chain.fee_polls(), 1);
    }

    #[tokio::test]
    async fn waits_out_a_fee_spike() {
        // Three expensive rounds, then gas gets cheap.
        let chain = Arc::new(ScriptedChain::new(
            vec![200 * GWEI, 200 * GWEI, 200 * GWEI, 20 * GWEI],
            vec![U256::from(10u128.pow(19))],
        ));
        let outcome = gate(chain.clone()).await_clear(Address::ZERO, 1_000_000).await;

        assert_eq!(outcome, GateOutcome::Clear);
        assert_eq!(chain.fee_polls(), 4);
    }

    #[tokio::test]
    async fn waits_for_funding() {
        let chain = Arc::new(ScriptedChain::new(
            vec![20 * GWEI],
            vec![U256::ZERO, U256::ZERO, U256::from(10u128.pow(19))],
        ));
        let outcome = gate(chain.clone()).await_clear(Address::ZERO, 1_000_000).await;

        assert_eq!(outcome, GateOutcome::Clear);
        assert_eq!(chain.fee_polls(), 3);
    }

    #[tokio::test]
    async fn fee_boundary_is_inclusive() {
        // base fee == ceiling - tip: predicted fee sits exactly at the
        // ceiling and the gate clears.
        let chain =
            Arc::new(ScriptedChain::new(vec![48 * GWEI], vec![U256::from(10u128.pow(19))]));
        let outcome = gate(chain).await_clear(Address::ZERO, 1_000_000).await;

        assert_eq!(outcome, GateOutcome::Clear);
    }

    #[tokio::test]
    async fn balance_boundary_is_inclusive() {
        // balance == ceiling * estimated gas clears.
        let estimated_gas = 1_000_000u64;
        let exact = U256::from(50 * GWEI) * U256::from(estimated_gas);
        let chain = Arc::new(ScriptedChain::new(vec![20 * GWEI], vec![exact]));
        let outcome = gate(chain).await_clear(Address::ZERO, estimated_gas).await;

        assert_eq!(outcome, GateOutcome::Clear);
    }

    #[tokio::test]
    async fn one_wei_under_the_balance_boundary_waits() {
        let estimated_gas = 1_000_000u64;
        let exact = U256::from(50 * GWEI) * U256::from(estimated_gas);
        let chain =
            Arc::new(ScriptedChain::new(vec![20 * GWEI], vec![exact - U256::from(1), exact]));
        let outcome = gate(chain.clone()).await_clear(Address::ZERO, estimated_gas).await;

        assert_eq!(outcome, GateOutcome::Clear);
        assert_eq!(chain.fee_polls(), 2);
    }

    #[tokio::test]
    async fn interrupt_cuts_the_wait_short() {
        // Gas never gets cheap; only the interrupt can end the wait.
        let chain = Arc::new(ScriptedChain::new(vec![200 * GWEI], vec![U256::ZERO]));
        let interrupt = InterruptFlag::new();
        let gate = FeeGate::new(
            chain,
            PublisherConfig::builder()
                .max_fee_per_gas(50 * GWEI)
                .retry_interval(Duration::from_secs(60))
                .build(),
            interrupt.clone(),
        );

        let handle = interrupt.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.interrupt();
        });

        let start = Instant::now();
        let outcome = gate.await_clear(Address::ZERO, 1_000_000).await;

        assert_eq!(outcome, GateOutcome::Interrupted);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn already_raised_interrupt_returns_without_polling() {
        let chain = Arc::new(ScriptedChain::new(vec![20 * GWEI], vec![U256::ZERO]));
        let interrupt = InterruptFlag::new();
        interrupt.interrupt();
        let gate = FeeGate::new(chain.clone(), test_config(), interrupt);

        let outcome = gate.await_clear(Address::ZERO, 1_000_000).await;

        assert_eq!(outcome, GateOutcome::Interrupted);
        assert_eq!(chain.fee_polls(), 0);
    }
}
