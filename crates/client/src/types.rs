//! Send options and receipt outcomes.

/// Per-send transaction parameters.
///
/// The nonce comes from the submitter's contiguous assignment; the gas and
/// fee fields come straight from the publisher configuration and are the
/// same for every transaction in a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendOpts {
    /// Transaction nonce.
    pub nonce: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Absolute fee ceiling in wei.
    pub max_fee_per_gas: u128,
    /// Priority tip in wei.
    pub max_priority_fee_per_gas: u128,
}

/// Decoded revert reason of a failed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevertReason {
    /// Error name, e.g. a custom error identifier from the rollup contract.
    pub name: String,
    /// Decoded error parameters, if any.
    pub params: Vec<String>,
}

impl RevertReason {
    /// Creates a reason with a name and no parameters.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), params: Vec::new() }
    }

    /// Best-effort parse of a node revert message.
    ///
    /// Handles the common shapes `"execution reverted: NAME(p1, p2)"` and
    /// `"execution reverted: NAME"`. Returns `None` when the message carries
    /// no usable reason.
    #[must_use]
    pub fn parse(msg: &str) -> Option<Self> {
        // ASCII lowering keeps byte offsets valid for slicing the original.
        let idx = msg.to_ascii_lowercase().find("reverted")?;
        let tail = msg[idx + "reverted".len()..].trim_start_matches(':').trim();
        if tail.is_empty() {
            return None;
        }
        match tail.split_once('(') {
            Some((name, rest)) => {
                let inner = rest.trim_end().trim_end_matches(')');
                let params = inner
                    .split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect();
                Some(Self { name: name.trim().to_string(), params })
            }
            None => Some(Self::named(tail)),
        }
    }
}

/// Terminal outcome of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    /// On-chain status bit.
    pub success: bool,
    /// Decoded revert reason when the status bit is clear.
    pub revert: Option<RevertReason>,
}

impl TxOutcome {
    /// A successfully mined transaction.
    #[must_use]
    pub const fn success() -> Self {
        Self { success: true, revert: None }
    }

    /// A mined-but-reverted transaction with an optional decoded reason.
    #[must_use]
    pub const fn reverted(revert: Option<RevertReason>) -> Self {
        Self { success: false, revert }
    }
}
