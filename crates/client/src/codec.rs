//! Transaction-data encoding seam.

use alloy::primitives::Bytes;
use sonora_primitives::{ProofSignature, Rollup};

use crate::error::ClientError;

/// Encodes rollup payloads into signable transaction byte sequences.
///
/// Encoding is owned by the surrounding system; the client only drives it.
/// `signatures` is the subset of the rollup's signatures whose on-chain
/// approval flag is not yet set.
pub trait RollupCodec: Send + Sync {
    /// Encodes the rollup-proof transaction payload.
    fn proof_tx(
        &self,
        rollup: &Rollup,
        signatures: &[ProofSignature],
    ) -> Result<Bytes, ClientError>;

    /// Encodes one broadcast-data transaction payload.
    fn broadcast_tx(&self, data: &Bytes) -> Result<Bytes, ClientError>;
}

#[cfg(test)]
mod tests {
    use sonora_primitives::RollupId;

    use super::*;

    /// Codec that frames payloads with a one-byte tag.
    struct TagCodec;

    impl RollupCodec for TagCodec {
        fn proof_tx(
            &self,
            rollup: &Rollup,
            signatures: &[ProofSignature],
        ) -> Result<Bytes, ClientError> {
            let mut out = vec![0x01, signatures.len() as u8];
            out.extend_from_slice(&rollup.proof);
            Ok(Bytes::from(out))
        }

        fn broadcast_tx(&self, data: &Bytes) -> Result<Bytes, ClientError> {
            let mut out = vec![0x02];
            out.extend_from_slice(data);
            Ok(Bytes::from(out))
        }
    }

    #[test]
    fn codec_frames_payloads() {
        let codec = TagCodec;
        let rollup = Rollup::new(RollupId(1), vec![0xaa, 0xbb]);

        let proof = codec.proof_tx(&rollup, &[]).unwrap();
        assert_eq!(proof.as_ref(), &[0x01, 0x00, 0xaa, 0xbb]);

        let broadcast = codec.broadcast_tx(&Bytes::from_static(&[0xcc])).unwrap();
        assert_eq!(broadcast.as_ref(), &[0x02, 0xcc]);
    }
}
