#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod block;
pub use block::{BlockRef, L1BlockRef, L2BlockRef};

mod genesis;
pub use genesis::ChainGenesis;

mod errors;
pub use errors::SourceErrorKind;

mod traits;
pub use traits::{ChainSource, L1ChainSource, L2ChainSource};

// Re-exported so implementors of the traits don't need to track the alloy crates themselves.
pub use alloy_eips::BlockNumHash;
pub use alloy_rpc_types_engine::{ForkchoiceState, ForkchoiceUpdated, PayloadStatusEnum};
pub use op_alloy_rpc_types_engine::OpPayloadAttributes;
