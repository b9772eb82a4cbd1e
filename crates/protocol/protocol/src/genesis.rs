//! Rollup genesis anchors.

use alloy_eips::BlockNumHash;

/// The genesis anchors of a rollup: the L1 block the rollup starts at and the L2 genesis block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ChainGenesis {
    /// The L1 block that the rollup starts *after* (no derived transactions).
    pub l1: BlockNumHash,
    /// The L2 genesis block.
    pub l2: BlockNumHash,
}

impl ChainGenesis {
    /// Creates a new [`ChainGenesis`].
    pub const fn new(l1: BlockNumHash, l2: BlockNumHash) -> Self {
        Self { l1, l2 }
    }

    /// Returns the number of L1 blocks that precede the L2 genesis block.
    pub const fn l1_alignment_offset(&self) -> u64 {
        self.l1.number
    }
}
