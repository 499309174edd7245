//! Shared data model for the sonora rollup publisher.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sonora-xyz/sonora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod rollup;
pub use rollup::{ProofSignature, Rollup, RollupId, SubmissionUnit};

mod units;
pub use units::{format_eth, format_gwei};

// Re-export the chain types the data model is built from.
pub use alloy::primitives::{Address, B256, Bytes, U256};
