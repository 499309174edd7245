//! Alloy-backed chain client.

use std::{sync::Arc, time::Duration};

use alloy::{
    eips::BlockId,
    network::TransactionBuilder,
    primitives::{Address, B256, Bytes, U256, keccak256},
    providers::Provider,
    rpc::types::{BlockNumberOrTag, TransactionReceipt, TransactionRequest},
};
use async_trait::async_trait;
use sonora_primitives::{Rollup, SubmissionUnit};

use crate::{
    client::ChainClient,
    codec::RollupCodec,
    error::ClientError,
    types::{RevertReason, SendOpts, TxOutcome},
};

/// Cadence for receipt polling within one timeout budget.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Chain client over an alloy provider.
///
/// All transactions target the rollup contract; payload encoding is
/// delegated to the injected [`RollupCodec`].
pub struct EthChainClient<P> {
    /// RPC provider, assumed wallet-enabled for the signer accounts.
    provider: Arc<P>,
    /// Address of the rollup contract.
    rollup_contract: Address,
    /// Encoder for proof and broadcast payloads.
    codec: Arc<dyn RollupCodec>,
}

impl<P> EthChainClient<P>
where
    P: Provider + Clone + Send + Sync,
{
    /// Creates a new client targeting `rollup_contract`.
    pub fn new(provider: Arc<P>, rollup_contract: Address, codec: Arc<dyn RollupCodec>) -> Self {
        Self { provider, rollup_contract, codec }
    }

    /// Best-effort revert decode: replays the failed call at the block it
    /// mined in and parses the node's revert message.
    async fn decode_revert(&self, receipt: &TransactionReceipt) -> Option<RevertReason> {
        let tx = self.provider.get_transaction_by_hash(receipt.transaction_hash).await.ok()??;
        let block = receipt.block_number?;
        match self.provider.call(tx.into_request()).block(BlockId::number(block)).await {
            Ok(_) => None,
            Err(e) => RevertReason::parse(&e.to_string()),
        }
    }
}

/// Calldata for `proofApproved(address,bytes32)` on the rollup contract.
fn approval_calldata(signer: Address, tx_id: B256) -> Bytes {
    let selector = &keccak256(b"proofApproved(address,bytes32)")[..4];
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(selector);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(signer.as_slice());
    data.extend_from_slice(tx_id.as_slice());
    Bytes::from(data)
}

#[async_trait]
impl<P> ChainClient for EthChainClient<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn build_batch(&self, rollup: &Rollup) -> Result<SubmissionUnit, ClientError> {
        let mut pending = Vec::with_capacity(rollup.signatures.len());
        for sig in &rollup.signatures {
            if self.proof_approval_status(sig.signer, sig.tx_id).await? {
                tracing::debug!(
                    signer = %sig.signer,
                    tx_id = %sig.tx_id,
                    "Signature already approved on-chain, omitting from batch"
                );
                continue;
            }
            pending.push(sig.clone());
        }

        let proof_tx = self.codec.proof_tx(rollup, &pending)?;
        let broadcast_txs = rollup
            .offchain_data
            .iter()
            .map(|data| self.codec.broadcast_tx(data))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SubmissionUnit { proof_tx, broadcast_txs })
    }

    async fn accounts(&self) -> Result<Vec<Address>, ClientError> {
        self.provider.get_accounts().await.map_err(|e| ClientError::Rpc(e.to_string()))
    }

    async fn latest_base_fee(&self) -> Result<u128, ClientError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?
            .ok_or_else(|| ClientError::Rpc("Latest block not found".to_string()))?;

        block.header.base_fee_per_gas.map(u128::from).ok_or(ClientError::MissingBaseFee)
    }

    async fn balance(&self, address: Address) -> Result<U256, ClientError> {
        self.provider.get_balance(address).await.map_err(|e| ClientError::Rpc(e.to_string()))
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ClientError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))
    }

    async fn send_transaction(
        &self,
        payload: &Bytes,
        opts: &SendOpts,
    ) -> Result<B256, ClientError> {
        let request = TransactionRequest::default()
            .with_to(self.rollup_contract)
            .with_input(payload.clone())
            .with_nonce(opts.nonce)
            .with_gas_limit(opts.gas_limit)
            .with_max_fee_per_gas(opts.max_fee_per_gas)
            .with_max_priority_fee_per_gas(opts.max_priority_fee_per_gas);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| ClientError::Send(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn receipt_with_timeout(
        &self,
        tx_hash: B256,
        timeout: Duration,
    ) -> Result<Option<TxOutcome>, ClientError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ClientError::Rpc(e.to_string()))?;

            if let Some(receipt) = receipt {
                if receipt.status() {
                    return Ok(Some(TxOutcome::success()));
                }
                let revert = self.decode_revert(&receipt).await;
                return Ok(Some(TxOutcome::reverted(revert)));
            }

            if tokio::time::Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    async fn proof_approval_status(
        &self,
        signer: Address,
        tx_id: B256,
    ) -> Result<bool, ClientError> {
        let request = TransactionRequest::default()
            .with_to(self.rollup_contract)
            .with_input(approval_calldata(signer, tx_id));

        let ret =
            self.provider.call(request).await.map_err(|e| ClientError::Rpc(e.to_string()))?;

        Ok(ret.last().is_some_and(|b| *b != 0))
    }
}

impl<P> std::fmt::Debug for EthChainClient<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthChainClient")
            .field("rollup_contract", &self.rollup_contract)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_calldata_layout() {
        let signer = Address::repeat_byte(0x11);
        let tx_id = B256::repeat_byte(0x22);
        let data = approval_calldata(signer, tx_id);

        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[..4], &keccak256(b"proofApproved(address,bytes32)")[..4]);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(&data[16..36], signer.as_slice());
        assert_eq!(&data[36..], tx_id.as_slice());
    }

    #[test]
    fn eth_chain_client_debug() {
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_debug::<EthChainClient<alloy::providers::RootProvider>>();
    }
}
