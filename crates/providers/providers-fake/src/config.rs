//! Configuration for the [`FakeChainSource`](crate::FakeChainSource).

use crate::chain::fake_genesis;
use opsim_protocol::ChainGenesis;

/// Describes the branches a [`FakeChainSource`](crate::FakeChainSource) is built from.
///
/// Each branch is a string of single-character block labels. L2 branch `i` is paired with L1
/// branch `i`, and its genesis originates from the L1 block at `l1_genesis_number`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FakeChainConfig {
    /// The alternate L1 branches, in reorg order.
    pub l1_branches: Vec<String>,
    /// The alternate L2 branches, in forkchoice order.
    pub l2_branches: Vec<String>,
    /// The number of L1 blocks preceding the L2 genesis.
    #[cfg_attr(feature = "serde", serde(default))]
    pub l1_genesis_number: u64,
}

impl FakeChainConfig {
    /// Creates a new [`FakeChainConfig`].
    pub fn new<L1, L2>(l1_branches: L1, l2_branches: L2, l1_genesis_number: u64) -> Self
    where
        L1: IntoIterator,
        L1::Item: Into<String>,
        L2: IntoIterator,
        L2::Item: Into<String>,
    {
        Self {
            l1_branches: l1_branches.into_iter().map(Into::into).collect(),
            l2_branches: l2_branches.into_iter().map(Into::into).collect(),
            l1_genesis_number,
        }
    }

    /// Appends an L1 branch.
    pub fn with_l1_branch(mut self, labels: impl Into<String>) -> Self {
        self.l1_branches.push(labels.into());
        self
    }

    /// Appends an L2 branch.
    pub fn with_l2_branch(mut self, labels: impl Into<String>) -> Self {
        self.l2_branches.push(labels.into());
        self
    }

    /// Sets the number of L1 blocks preceding the L2 genesis.
    pub const fn with_l1_genesis_number(mut self, l1_genesis_number: u64) -> Self {
        self.l1_genesis_number = l1_genesis_number;
        self
    }

    /// Returns the fake rollup genesis for the given genesis labels.
    pub fn genesis(&self, l1: char, l2: char) -> ChainGenesis {
        fake_genesis(l1, l2, self.l1_genesis_number)
    }
}
