//! Block reference types for the L1 and L2 chains.

use alloy_eips::BlockNumHash;
use alloy_primitives::B256;

/// Alias for the reference type of an L1 block.
pub type L1BlockRef = BlockRef;

/// A reference to a block: its identity plus the hash of its parent.
///
/// The genesis block (number `0`) has a zero parent hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BlockRef {
    /// The block hash.
    pub hash: B256,
    /// The block number.
    pub number: u64,
    /// The parent block hash.
    pub parent_hash: B256,
}

impl BlockRef {
    /// Creates a new [`BlockRef`].
    pub const fn new(hash: B256, number: u64, parent_hash: B256) -> Self {
        Self { hash, number, parent_hash }
    }

    /// Returns the block ID.
    pub const fn id(&self) -> BlockNumHash {
        BlockNumHash { hash: self.hash, number: self.number }
    }

    /// Returns `true` if `child` directly extends this block.
    pub fn is_parent_of(&self, child: &Self) -> bool {
        self.number + 1 == child.number && self.hash == child.parent_hash
    }
}

impl core::fmt::Display for BlockRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "BlockRef {{ hash: {}, number: {}, parent_hash: {} }}",
            self.hash, self.number, self.parent_hash
        )
    }
}

impl From<BlockRef> for BlockNumHash {
    fn from(block: BlockRef) -> Self {
        block.id()
    }
}

/// A reference to an L2 block, carrying the ID of the L1 block it originated from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct L2BlockRef {
    /// The L2 block reference.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub block_ref: BlockRef,
    /// The L1 origin of the L2 block.
    pub l1_origin: BlockNumHash,
}

impl L2BlockRef {
    /// Creates a new [`L2BlockRef`].
    pub const fn new(block_ref: BlockRef, l1_origin: BlockNumHash) -> Self {
        Self { block_ref, l1_origin }
    }

    /// Returns the block ID.
    pub const fn id(&self) -> BlockNumHash {
        self.block_ref.id()
    }

    /// Returns the block hash.
    pub const fn hash(&self) -> B256 {
        self.block_ref.hash
    }

    /// Returns the block number.
    pub const fn number(&self) -> u64 {
        self.block_ref.number
    }

    /// Returns the parent block hash.
    pub const fn parent_hash(&self) -> B256 {
        self.block_ref.parent_hash
    }
}

impl core::fmt::Display for L2BlockRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "L2BlockRef {{ hash: {}, number: {}, parent_hash: {}, l1_origin: {}#{} }}",
            self.block_ref.hash,
            self.block_ref.number,
            self.block_ref.parent_hash,
            self.l1_origin.hash,
            self.l1_origin.number
        )
    }
}

impl From<L2BlockRef> for BlockNumHash {
    fn from(block: L2BlockRef) -> Self {
        block.id()
    }
}
