//! Rollup submission units.

use core::fmt;

use alloy::primitives::{Address, B256, Bytes};

/// Identifier of a rollup in the surrounding rollup database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RollupId(pub u64);

impl fmt::Display for RollupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RollupId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One upstream proof signature.
///
/// A signature is dropped from the batch when the rollup contract already
/// carries the approval flag for its `(signer, tx_id)` pair; the check
/// happens during batch construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofSignature {
    /// Account that produced the signature.
    pub signer: Address,
    /// Transaction the signature approves.
    pub tx_id: B256,
    /// Raw signature bytes.
    pub bytes: Bytes,
}

/// A locally-aggregated rollup ready for publication.
///
/// The proof and off-chain data are opaque to the publisher; only their
/// ordering matters.
#[derive(Clone, Debug)]
pub struct Rollup {
    /// Identifier used when reporting progress to the rollup database.
    pub id: RollupId,
    /// Aggregated rollup proof.
    pub proof: Bytes,
    /// Signatures to bundle with the proof.
    pub signatures: Vec<ProofSignature>,
    /// Off-chain transaction payloads to broadcast ahead of the proof.
    pub offchain_data: Vec<Bytes>,
}

impl Rollup {
    /// Creates a rollup with no signatures and no off-chain data.
    pub fn new(id: RollupId, proof: impl Into<Bytes>) -> Self {
        Self { id, proof: proof.into(), signatures: Vec::new(), offchain_data: Vec::new() }
    }

    /// Attaches proof signatures.
    #[must_use]
    pub fn with_signatures(mut self, signatures: Vec<ProofSignature>) -> Self {
        self.signatures = signatures;
        self
    }

    /// Attaches off-chain broadcast payloads.
    #[must_use]
    pub fn with_offchain_data(mut self, offchain_data: Vec<Bytes>) -> Self {
        self.offchain_data = offchain_data;
        self
    }
}

/// Signable transaction byte sequences packaged from a [`Rollup`].
///
/// Broadcast transactions are dispatched first, in order; the proof
/// transaction is always dispatched last.
#[derive(Clone, Debug)]
pub struct SubmissionUnit {
    /// The rollup-proof transaction payload.
    pub proof_tx: Bytes,
    /// Broadcast-data transaction payloads, in dispatch order.
    pub broadcast_txs: Vec<Bytes>,
}

impl SubmissionUnit {
    /// Total number of transactions in the batch.
    #[must_use]
    pub fn tx_count(&self) -> usize {
        self.broadcast_txs.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn rollup_id_display() {
        assert_eq!(RollupId(42).to_string(), "42");
        assert_eq!(RollupId::from(7u64), RollupId(7));
    }

    #[test]
    fn rollup_new_is_empty() {
        let rollup = Rollup::new(RollupId(1), vec![1u8, 2, 3]);
        assert_eq!(rollup.id, RollupId(1));
        assert_eq!(rollup.proof, Bytes::from(vec![1u8, 2, 3]));
        assert!(rollup.signatures.is_empty());
        assert!(rollup.offchain_data.is_empty());
    }

    #[test]
    fn rollup_builder_chaining() {
        let sig = ProofSignature {
            signer: Address::repeat_byte(1),
            tx_id: B256::repeat_byte(2),
            bytes: Bytes::from_static(&[0xaa]),
        };
        let rollup = Rollup::new(RollupId(3), Bytes::new())
            .with_signatures(vec![sig.clone()])
            .with_offchain_data(vec![Bytes::from_static(&[0xbb])]);

        assert_eq!(rollup.signatures, vec![sig]);
        assert_eq!(rollup.offchain_data.len(), 1);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 2)]
    #[case(5, 6)]
    fn submission_unit_tx_count(#[case] broadcasts: usize, #[case] expected: usize) {
        let unit = SubmissionUnit {
            proof_tx: Bytes::from_static(&[0x01]),
            broadcast_txs: vec![Bytes::new(); broadcasts],
        };
        assert_eq!(unit.tx_count(), expected);
    }
}
