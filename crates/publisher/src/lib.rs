//! Rollup publisher: ordered L1 batch dispatch with fee gating, idempotent
//! retry, and cooperative interruption.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sonora-xyz/sonora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{PublisherConfig, PublisherConfigBuilder};

mod confirm;
pub use confirm::{ConfirmOutcome, INCORRECT_STATE_HASH, ReceiptConfirmer};

mod db;
pub use db::{DbError, InMemoryRollupDb, RollupDb, RollupRecord};

mod gate;
pub use gate::{FeeGate, GateOutcome};

mod interrupt;
pub use interrupt::InterruptFlag;

mod metrics;
pub use metrics::{PublishTimer, PublisherMetrics};

mod publisher;
pub use publisher::{PublishOutcome, RollupPublisher};

mod status;
pub use status::{TxStatus, batch_statuses};

mod submit;
pub use submit::{BatchSubmitter, SubmitOutcome};
