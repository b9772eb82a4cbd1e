//! Chain source interfaces.
//!
//! These traits describe the queries chain-sync logic issues against the L1 and L2 chains. A
//! production client serves them over RPC; the simulator in `opsim-providers-fake` serves them
//! from prepared in-memory branches so sync logic can be tested against scripted reorgs.

use crate::{L1BlockRef, L2BlockRef, SourceErrorKind};
use alloc::{boxed::Box, vec::Vec};
use alloy_eips::BlockNumHash;
use alloy_primitives::B256;
use alloy_rpc_types_engine::{ForkchoiceState, ForkchoiceUpdated};
use async_trait::async_trait;
use core::fmt::{Debug, Display};
use op_alloy_rpc_types_engine::OpPayloadAttributes;

/// Describes the L1 queries of a chain source.
///
/// Every lookup is bounded by the source's view of the L1 head: a block the source has not
/// observed yet is reported as a [`SourceErrorKind::Temporary`] error rather than a failure.
#[async_trait]
pub trait L1ChainSource {
    /// The error type for the source.
    type Error: Display + Debug + Into<SourceErrorKind>;

    /// Returns the current L1 head.
    async fn l1_head_block_ref(&mut self) -> Result<L1BlockRef, Self::Error>;

    /// Returns the L1 block with the given number.
    async fn l1_block_ref_by_number(&mut self, number: u64) -> Result<L1BlockRef, Self::Error>;

    /// Returns the L1 block with the given hash.
    async fn l1_block_ref_by_hash(&mut self, hash: B256) -> Result<L1BlockRef, Self::Error>;

    /// Returns up to `max` IDs of the L1 blocks following `base`, in ascending order.
    ///
    /// The range never extends past the current head. Errors if `base` is not part of the
    /// canonical chain up to the head.
    async fn l1_range(
        &mut self,
        base: BlockNumHash,
        max: u64,
    ) -> Result<Vec<BlockNumHash>, Self::Error>;
}

/// Describes the L2 queries and the head-update command of a chain source.
#[async_trait]
pub trait L2ChainSource {
    /// The error type for the source.
    type Error: Display + Debug + Into<SourceErrorKind>;

    /// Returns the L2 block with the given number, or the current L2 head if `number` is
    /// [`None`].
    async fn l2_block_ref_by_number(
        &mut self,
        number: Option<u64>,
    ) -> Result<L2BlockRef, Self::Error>;

    /// Returns the L2 block with the given hash.
    async fn l2_block_ref_by_hash(&mut self, hash: B256) -> Result<L2BlockRef, Self::Error>;

    /// Requests the L2 chain to adopt `state.head_block_hash` as its head, optionally
    /// starting a payload build with the given attributes.
    async fn forkchoice_update(
        &mut self,
        state: ForkchoiceState,
        attributes: Option<OpPayloadAttributes>,
    ) -> Result<ForkchoiceUpdated, Self::Error>;
}

/// A source serving both the L1 and the L2 chain.
pub trait ChainSource: L1ChainSource + L2ChainSource {}

impl<T> ChainSource for T where T: L1ChainSource + L2ChainSource {}
