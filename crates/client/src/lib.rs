//! Chain client seam for the sonora rollup publisher.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sonora-xyz/sonora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod client;
pub use client::ChainClient;

mod codec;
pub use codec::RollupCodec;

mod error;
pub use error::ClientError;

mod eth;
pub use eth::EthChainClient;

mod types;
pub use types::{RevertReason, SendOpts, TxOutcome};
