//! Builders for fake, fully linked chain branches.
//!
//! A branch is described by a string of block labels, one character per block. Each label is
//! turned into a stable, human-recognizable hash so tests can assert on blocks by label.

use alloy_eips::BlockNumHash;
use alloy_primitives::B256;
use opsim_protocol::{BlockRef, ChainGenesis, L1BlockRef, L2BlockRef};

/// Returns the fake hash for a block label: the UTF-8 bytes of the label followed by zeroes.
///
/// The `'\0'` label maps to [`B256::ZERO`], which is what an unset parent label encodes to.
pub fn fake_hash(label: char) -> B256 {
    let mut hash = B256::ZERO;
    label.encode_utf8(&mut hash.0[..4]);
    hash
}

/// Returns the fake block ID for a label at the given height.
pub fn fake_id(label: char, number: u64) -> BlockNumHash {
    BlockNumHash { hash: fake_hash(label), number }
}

/// Returns the fake rollup genesis: the L1 block `l1` at `l1_genesis_number` and the L2 block
/// `l2` at height zero.
pub fn fake_genesis(l1: char, l2: char, l1_genesis_number: u64) -> ChainGenesis {
    ChainGenesis::new(fake_id(l1, l1_genesis_number), fake_id(l2, 0))
}

/// Returns a fake L1 block. The genesis block has no parent.
pub fn fake_l1_block(label: char, parent: char, number: u64) -> L1BlockRef {
    let parent_hash = if number == 0 { B256::ZERO } else { fake_hash(parent) };
    BlockRef::new(fake_hash(label), number, parent_hash)
}

/// Returns a fake L2 block derived from `l1_origin`. The genesis block has no parent.
pub fn fake_l2_block(
    label: char,
    parent: char,
    l1_origin: BlockNumHash,
    number: u64,
) -> L2BlockRef {
    let parent_hash = if number == 0 { B256::ZERO } else { fake_hash(parent) };
    L2BlockRef::new(BlockRef::new(fake_hash(label), number, parent_hash), l1_origin)
}

/// Builds an L1 branch from `labels`, numbering blocks from `offset`.
///
/// Every block's parent is the preceding label; the first block of the branch has a zero
/// parent hash.
pub fn chain_l1(offset: u64, labels: &str) -> Vec<L1BlockRef> {
    let mut parent = '\0';
    labels
        .chars()
        .enumerate()
        .map(|(i, label)| {
            let block = fake_l1_block(label, parent, offset + i as u64);
            parent = label;
            block
        })
        .collect()
}

/// Builds an L2 branch from `labels`, numbering blocks from zero.
///
/// The L2 block at position `i` originates from `l1[l1_offset + i]`.
///
/// # Panics
///
/// Panics if `l1` is too short to provide an origin for every label.
pub fn chain_l2(l1_offset: u64, l1: &[L1BlockRef], labels: &str) -> Vec<L2BlockRef> {
    let mut parent = '\0';
    labels
        .chars()
        .enumerate()
        .map(|(i, label)| {
            let origin_index = l1_offset as usize + i;
            let Some(origin) = l1.get(origin_index) else {
                panic!(
                    "bad test, L2 block {label:?} at {i} needs L1 origin at index {origin_index}, \
                     but the L1 branch has {} blocks",
                    l1.len()
                );
            };
            let block = fake_l2_block(label, parent, origin.id(), i as u64);
            parent = label;
            block
        })
        .collect()
}
