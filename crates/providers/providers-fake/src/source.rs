//! A branch-aware fake chain source.
//!
//! The [`FakeChainSource`] holds every alternate history of the L1 and L2 chains up front and
//! answers queries against the active branch of each chain. Reorgs are simulated by moving to
//! the next prepared branch, so a test fully scripts which history the code under test sees.

use crate::{
    FakeChainConfig, FakeChainSourceError,
    chain::{chain_l1, chain_l2},
};
use alloy_eips::BlockNumHash;
use alloy_primitives::B256;
use alloy_rpc_types_engine::{ForkchoiceState, ForkchoiceUpdated, PayloadStatusEnum};
use async_trait::async_trait;
use opsim_protocol::{L1BlockRef, L1ChainSource, L2BlockRef, L2ChainSource, OpPayloadAttributes};
use tracing::{debug, trace};

/// The tracing target of the fake chain source.
const TARGET: &str = "fake_chain";

/// A fake implementation of the L1 and L2 chain sources that lets tests control the head of
/// each chain and switch between prepared branches to simulate reorgs.
///
/// Every query is bounded by the head of its chain: blocks past the head are reported as not
/// found, just like blocks an upstream node has not produced yet. Driving the simulator past
/// what it was built for (advancing past the end of a branch, or reorging without a further
/// branch) is a broken test and panics.
#[derive(Debug, Clone)]
pub struct FakeChainSource {
    /// Index of the active L1 branch.
    l1_reorg: usize,
    /// Index of the active L2 branch.
    l2_reorg: usize,
    /// Index of the L1 head on the active L1 branch.
    l1_head: usize,
    /// Index of the L2 head on the active L2 branch.
    l2_head: usize,
    /// `l1s[reorg]` is the L1 chain in that specific reorg configuration.
    l1s: Vec<Vec<L1BlockRef>>,
    /// `l2s[reorg]` is the L2 chain in that specific reorg configuration.
    l2s: Vec<Vec<L2BlockRef>>,
}

impl FakeChainSource {
    /// Creates a new [`FakeChainSource`] from branch descriptions.
    ///
    /// Each L1 branch is numbered from genesis. L2 branch `i` is paired with L1 branch `i`, and
    /// its genesis block originates from the L1 block at `l1_genesis_number`.
    ///
    /// # Panics
    ///
    /// Panics if there is no L1 or no L2 branch, if there are more L2 than L1 branches, or if an
    /// L1 branch is too short to provide the origins of its paired L2 branch.
    pub fn new(l1: &[&str], l2: &[&str], l1_genesis_number: u64) -> Self {
        assert!(!l1.is_empty(), "bad test, no l1 branches");
        assert!(!l2.is_empty(), "bad test, no l2 branches");
        assert!(
            l2.len() <= l1.len(),
            "bad test, {} l2 branches but only {} l1 branches to pair them with",
            l2.len(),
            l1.len()
        );

        let l1s: Vec<_> = l1.iter().map(|labels| chain_l1(0, labels)).collect();
        let l2s = l2
            .iter()
            .zip(&l1s)
            .map(|(labels, l1)| chain_l2(l1_genesis_number, l1, labels))
            .collect();

        Self { l1_reorg: 0, l2_reorg: 0, l1_head: 0, l2_head: 0, l1s, l2s }
    }

    /// Creates a new [`FakeChainSource`] from a [`FakeChainConfig`].
    ///
    /// # Panics
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &FakeChainConfig) -> Self {
        let l1: Vec<&str> = config.l1_branches.iter().map(String::as_str).collect();
        let l2: Vec<&str> = config.l2_branches.iter().map(String::as_str).collect();
        Self::new(&l1, &l2, config.l1_genesis_number)
    }

    /// Advances the L1 head by one block and returns the new head.
    ///
    /// # Panics
    ///
    /// Panics if the head would move past the end of the active L1 branch.
    pub fn advance_l1(&mut self) -> L1BlockRef {
        trace!(
            target: TARGET,
            new_head = self.l1_head + 1,
            old_head = self.l1_head,
            "Advance L1"
        );
        if self.l1_head + 1 >= self.active_l1().len() {
            panic!("Cannot advance L1 past end of chain");
        }
        self.l1_head += 1;

        #[cfg(feature = "metrics")]
        metrics::gauge!(crate::Metrics::L1_HEAD).set(self.l1_head as f64);

        self.l1_block_at(self.l1_head)
    }

    /// Sets the L2 head to the block at `head` on the active L2 branch and returns it.
    ///
    /// The head may move backwards as well as forwards.
    ///
    /// # Panics
    ///
    /// Panics if `head` is past the end of the active L2 branch.
    pub fn set_l2_head(&mut self, head: usize) -> L2BlockRef {
        trace!(target: TARGET, new_head = head, old_head = self.l2_head, "Set L2 head");
        let Some(block) = self.active_l2().get(head).copied() else {
            panic!("Cannot advance L2 past end of chain");
        };
        self.l2_head = head;

        #[cfg(feature = "metrics")]
        metrics::gauge!(crate::Metrics::L2_HEAD).set(self.l2_head as f64);

        block
    }

    /// Switches to the next prepared L1 branch.
    ///
    /// The L1 head index is left untouched and is read against the new branch.
    ///
    /// # Panics
    ///
    /// Panics if there is no further L1 branch.
    pub fn reorg_l1(&mut self) {
        debug!(
            target: TARGET,
            new_reorg = self.l1_reorg + 1,
            old_reorg = self.l1_reorg,
            "Reorg L1"
        );
        if self.l1_reorg + 1 >= self.l1s.len() {
            panic!("No more re-org chains available");
        }
        self.l1_reorg += 1;

        #[cfg(feature = "metrics")]
        metrics::counter!(crate::Metrics::L1_REORGS).increment(1);
    }

    /// Returns the current L1 head.
    ///
    /// # Panics
    ///
    /// Panics if the head is past the end of the active L1 branch.
    pub fn l1_head(&self) -> L1BlockRef {
        trace!(target: TARGET, head = self.l1_head, "L1 head");
        self.l1_block_at(self.l1_head)
    }

    /// Returns the index of the active L1 branch.
    pub const fn l1_reorg_index(&self) -> usize {
        self.l1_reorg
    }

    /// Returns the index of the active L2 branch.
    pub const fn l2_reorg_index(&self) -> usize {
        self.l2_reorg
    }

    /// Returns the index of the L1 head on the active L1 branch.
    pub const fn l1_head_index(&self) -> usize {
        self.l1_head
    }

    /// Returns the index of the L2 head on the active L2 branch.
    pub const fn l2_head_index(&self) -> usize {
        self.l2_head
    }

    /// Returns the number of prepared L1 branches.
    pub fn l1_branch_count(&self) -> usize {
        self.l1s.len()
    }

    /// Returns the number of prepared L2 branches.
    pub fn l2_branch_count(&self) -> usize {
        self.l2s.len()
    }

    fn active_l1(&self) -> &[L1BlockRef] {
        &self.l1s[self.l1_reorg]
    }

    fn active_l2(&self) -> &[L2BlockRef] {
        &self.l2s[self.l2_reorg]
    }

    fn l1_block_at(&self, index: usize) -> L1BlockRef {
        match self.active_l1().get(index) {
            Some(block) => *block,
            None => panic!(
                "bad test, L1 index {index} is past the end of L1 branch {}",
                self.l1_reorg
            ),
        }
    }

    fn l2_block_at(&self, index: usize) -> L2BlockRef {
        match self.active_l2().get(index) {
            Some(block) => *block,
            None => panic!(
                "bad test, L2 index {index} is past the end of L2 branch {}",
                self.l2_reorg
            ),
        }
    }

    fn l1_by_number(&self, number: u64) -> Result<L1BlockRef, FakeChainSourceError> {
        if number > self.l1_head as u64 {
            return Err(FakeChainSourceError::BlockNotFound(number));
        }
        Ok(self.l1_block_at(number as usize))
    }

    fn l1_by_hash(&self, hash: B256) -> Result<L1BlockRef, FakeChainSourceError> {
        self.active_l1()
            .iter()
            .position(|block| block.hash == hash)
            .ok_or(FakeChainSourceError::HashNotFound(hash))
            .and_then(|index| self.l1_by_number(index as u64))
    }

    fn l1_head_ref(&self) -> Result<L1BlockRef, FakeChainSourceError> {
        if self.active_l1().is_empty() {
            return Err(FakeChainSourceError::EmptyChain);
        }
        Ok(self.l1_block_at(self.l1_head))
    }

    fn l1_range_from(
        &self,
        base: BlockNumHash,
        max: u64,
    ) -> Result<Vec<BlockNumHash>, FakeChainSourceError> {
        let mut out = Vec::new();
        let mut found = false;
        for (i, block) in self.active_l1().iter().enumerate() {
            if found && (out.len() as u64) < max {
                out.push(block.id());
            }
            if block.id() == base {
                found = true;
            }
            if i == self.l1_head {
                return if found {
                    Ok(out)
                } else {
                    Err(FakeChainSourceError::RangeBaseNotFound(base))
                };
            }
        }
        Err(FakeChainSourceError::RangeBaseNotFound(base))
    }

    fn l2_by_number(&self, number: Option<u64>) -> Result<L2BlockRef, FakeChainSourceError> {
        if self.active_l2().is_empty() {
            panic!("bad test, no l2 chain");
        }
        let Some(number) = number else {
            return Ok(self.l2_block_at(self.l2_head));
        };
        if number > self.l2_head as u64 {
            return Err(FakeChainSourceError::BlockNotFound(number));
        }
        Ok(self.l2_block_at(number as usize))
    }

    fn l2_by_hash(&self, hash: B256) -> Result<L2BlockRef, FakeChainSourceError> {
        self.active_l2()
            .iter()
            .position(|block| block.hash() == hash)
            .ok_or(FakeChainSourceError::HashNotFound(hash))
            .and_then(|index| self.l2_by_number(Some(index as u64)))
    }

    /// Moves to the next L2 branch and adopts `head` on it, if present.
    fn apply_forkchoice(&mut self, head: B256) -> Result<ForkchoiceUpdated, FakeChainSourceError> {
        if self.l2_reorg + 1 >= self.l2s.len() {
            panic!("No more re-org chains available");
        }
        self.l2_reorg += 1;
        debug!(target: TARGET, reorg = self.l2_reorg, "Switched to the next L2 branch");

        let Some(index) = self.active_l2().iter().position(|block| block.hash() == head) else {
            #[cfg(feature = "metrics")]
            metrics::counter!(crate::Metrics::FORKCHOICE_UPDATES, "status" => "unknown_head")
                .increment(1);
            return Err(FakeChainSourceError::UnknownHead(head));
        };
        self.l2_head = index;

        #[cfg(feature = "metrics")]
        {
            metrics::counter!(crate::Metrics::FORKCHOICE_UPDATES, "status" => "valid")
                .increment(1);
            metrics::gauge!(crate::Metrics::L2_HEAD).set(self.l2_head as f64);
        }

        Ok(ForkchoiceUpdated::from_status(PayloadStatusEnum::Valid).with_latest_valid_hash(head))
    }
}

/// Records the outcome of a query in the metrics, if enabled.
fn observe<T>(
    method: &'static str,
    result: Result<T, FakeChainSourceError>,
) -> Result<T, FakeChainSourceError> {
    #[cfg(feature = "metrics")]
    crate::Metrics::record_query(
        method,
        result.as_ref().is_err_and(|err| err.is_not_found()),
    );
    #[cfg(not(feature = "metrics"))]
    let _ = method;
    result
}

#[async_trait]
impl L1ChainSource for FakeChainSource {
    type Error = FakeChainSourceError;

    async fn l1_head_block_ref(&mut self) -> Result<L1BlockRef, Self::Error> {
        trace!(target: TARGET, l1_head = self.l1_head, reorg = self.l1_reorg, "L1HeadBlockRef");
        observe("l1_head_block_ref", self.l1_head_ref())
    }

    async fn l1_block_ref_by_number(&mut self, number: u64) -> Result<L1BlockRef, Self::Error> {
        trace!(
            target: TARGET,
            l1_num = number,
            l1_head = self.l1_head,
            reorg = self.l1_reorg,
            "L1BlockRefByNumber"
        );
        observe("l1_block_ref_by_number", self.l1_by_number(number))
    }

    async fn l1_block_ref_by_hash(&mut self, hash: B256) -> Result<L1BlockRef, Self::Error> {
        trace!(
            target: TARGET,
            l1_hash = %hash,
            l1_head = self.l1_head,
            reorg = self.l1_reorg,
            "L1BlockRefByHash"
        );
        observe("l1_block_ref_by_hash", self.l1_by_hash(hash))
    }

    async fn l1_range(
        &mut self,
        base: BlockNumHash,
        max: u64,
    ) -> Result<Vec<BlockNumHash>, Self::Error> {
        trace!(
            target: TARGET,
            base_hash = %base.hash,
            base_number = base.number,
            max,
            l1_head = self.l1_head,
            reorg = self.l1_reorg,
            "L1Range"
        );
        observe("l1_range", self.l1_range_from(base, max))
    }
}

#[async_trait]
impl L2ChainSource for FakeChainSource {
    type Error = FakeChainSourceError;

    async fn l2_block_ref_by_number(
        &mut self,
        number: Option<u64>,
    ) -> Result<L2BlockRef, Self::Error> {
        trace!(
            target: TARGET,
            l2_num = ?number,
            l2_head = self.l2_head,
            reorg = self.l2_reorg,
            "L2BlockRefByNumber"
        );
        observe("l2_block_ref_by_number", self.l2_by_number(number))
    }

    async fn l2_block_ref_by_hash(&mut self, hash: B256) -> Result<L2BlockRef, Self::Error> {
        trace!(
            target: TARGET,
            l2_hash = %hash,
            l2_head = self.l2_head,
            reorg = self.l2_reorg,
            "L2BlockRefByHash"
        );
        observe("l2_block_ref_by_hash", self.l2_by_hash(hash))
    }

    async fn forkchoice_update(
        &mut self,
        state: ForkchoiceState,
        _attributes: Option<OpPayloadAttributes>,
    ) -> Result<ForkchoiceUpdated, Self::Error> {
        trace!(
            target: TARGET,
            new_head = %state.head_block_hash,
            l2_head = self.l2_head,
            reorg = self.l2_reorg,
            "ForkchoiceUpdate"
        );
        observe("forkchoice_update", self.apply_forkchoice(state.head_block_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{fake_hash, fake_id};
    use rstest::{fixture, rstest};

    #[fixture]
    fn source() -> FakeChainSource {
        FakeChainSource::new(&["ABCD", "ABCE"], &["WXYZ", "WXQR"], 0)
    }

    fn head(label: char) -> ForkchoiceState {
        ForkchoiceState { head_block_hash: fake_hash(label), ..Default::default() }
    }

    #[rstest]
    fn test_new_starts_at_genesis(source: FakeChainSource) {
        assert_eq!(source.l1_reorg_index(), 0);
        assert_eq!(source.l2_reorg_index(), 0);
        assert_eq!(source.l1_head_index(), 0);
        assert_eq!(source.l2_head_index(), 0);
        assert_eq!(source.l1_branch_count(), 2);
        assert_eq!(source.l2_branch_count(), 2);
        assert_eq!(source.l1_head().id(), fake_id('A', 0));
    }

    #[test]
    fn test_from_config() {
        let config = FakeChainConfig::new(["ABCD"], ["XY"], 2);
        let source = FakeChainSource::from_config(&config);
        assert_eq!(source.active_l2()[0].l1_origin, fake_id('C', 2));
        assert_eq!(source.active_l2()[1].l1_origin, fake_id('D', 3));
    }

    #[test]
    #[should_panic(expected = "only 1 l1 branches")]
    fn test_new_more_l2_than_l1_branches() {
        FakeChainSource::new(&["AB"], &["W", "X"], 0);
    }

    #[test]
    #[should_panic(expected = "no l1 branches")]
    fn test_new_without_l1_branches() {
        FakeChainSource::new(&[], &["W"], 0);
    }

    #[rstest]
    fn test_advance_l1(mut source: FakeChainSource) {
        let head = source.advance_l1();
        assert_eq!(head.id(), fake_id('B', 1));
        assert_eq!(source.l1_head(), head);
        assert_eq!(source.l1_head_index(), 1);
    }

    #[rstest]
    #[should_panic(expected = "Cannot advance L1 past end of chain")]
    fn test_advance_l1_past_end(mut source: FakeChainSource) {
        for _ in 0..4 {
            source.advance_l1();
        }
    }

    #[rstest]
    fn test_set_l2_head_moves_both_ways(mut source: FakeChainSource) {
        assert_eq!(source.set_l2_head(3).hash(), fake_hash('Z'));
        assert_eq!(source.set_l2_head(1).hash(), fake_hash('X'));
        assert_eq!(source.l2_head_index(), 1);
    }

    #[rstest]
    #[should_panic(expected = "Cannot advance L2 past end of chain")]
    fn test_set_l2_head_past_end(mut source: FakeChainSource) {
        source.set_l2_head(4);
    }

    #[rstest]
    fn test_reorg_l1_keeps_head(mut source: FakeChainSource) {
        source.advance_l1();
        source.reorg_l1();
        assert_eq!(source.l1_reorg_index(), 1);
        assert_eq!(source.l1_head_index(), 1);
    }

    #[rstest]
    #[should_panic(expected = "No more re-org chains available")]
    fn test_reorg_l1_exhausted(mut source: FakeChainSource) {
        source.reorg_l1();
        source.reorg_l1();
    }

    #[rstest]
    #[tokio::test]
    async fn test_l1_head_block_ref(mut source: FakeChainSource) {
        assert_eq!(source.l1_head_block_ref().await.unwrap().id(), fake_id('A', 0));
        source.advance_l1();
        assert_eq!(source.l1_head_block_ref().await.unwrap().id(), fake_id('B', 1));
    }

    #[tokio::test]
    async fn test_l1_head_block_ref_empty_branch() {
        let mut source = FakeChainSource::new(&[""], &[""], 0);
        assert_eq!(source.l1_head_block_ref().await, Err(FakeChainSourceError::EmptyChain));
    }

    #[rstest]
    #[tokio::test]
    async fn test_l1_by_number_is_head_bounded(mut source: FakeChainSource) {
        assert_eq!(
            source.l1_block_ref_by_number(1).await,
            Err(FakeChainSourceError::BlockNotFound(1))
        );
        source.advance_l1();
        assert_eq!(source.l1_block_ref_by_number(1).await.unwrap().id(), fake_id('B', 1));
        assert_eq!(source.l1_block_ref_by_number(0).await.unwrap().id(), fake_id('A', 0));
    }

    #[rstest]
    #[tokio::test]
    async fn test_l1_by_hash(mut source: FakeChainSource) {
        // 'C' is on the branch but past the head.
        assert_eq!(
            source.l1_block_ref_by_hash(fake_hash('C')).await,
            Err(FakeChainSourceError::BlockNotFound(2))
        );
        assert_eq!(
            source.l1_block_ref_by_hash(fake_hash('Q')).await,
            Err(FakeChainSourceError::HashNotFound(fake_hash('Q')))
        );
        source.advance_l1();
        source.advance_l1();
        let block = source.l1_block_ref_by_hash(fake_hash('C')).await.unwrap();
        assert_eq!(block.number, 2);
        assert_eq!(block.parent_hash, fake_hash('B'));
    }

    #[rstest]
    #[tokio::test]
    async fn test_l1_range(mut source: FakeChainSource) {
        for _ in 0..3 {
            source.advance_l1();
        }
        let range = source.l1_range(fake_id('A', 0), 10).await.unwrap();
        assert_eq!(range, vec![fake_id('B', 1), fake_id('C', 2), fake_id('D', 3)]);

        let range = source.l1_range(fake_id('A', 0), 2).await.unwrap();
        assert_eq!(range, vec![fake_id('B', 1), fake_id('C', 2)]);

        assert!(source.l1_range(fake_id('D', 3), 10).await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_l1_range_zero_max(mut source: FakeChainSource) {
        source.advance_l1();
        assert_eq!(source.l1_range(fake_id('A', 0), 0).await, Ok(vec![]));
    }

    #[tokio::test]
    #[should_panic(expected = "bad test, L1 index 3 is past the end of L1 branch 1")]
    async fn test_l1_read_after_reorg_onto_shorter_branch() {
        let mut source = FakeChainSource::new(&["ABCD", "AB"], &["W"], 0);
        for _ in 0..3 {
            source.advance_l1();
        }
        source.reorg_l1();
        let _ = source.l1_block_ref_by_number(3).await;
    }

    #[rstest]
    #[tokio::test]
    async fn test_l1_range_base_past_head(mut source: FakeChainSource) {
        source.advance_l1();
        let base = fake_id('C', 2);
        assert_eq!(
            source.l1_range(base, 10).await,
            Err(FakeChainSourceError::RangeBaseNotFound(base))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_l1_range_base_number_mismatch(mut source: FakeChainSource) {
        source.advance_l1();
        // Right hash, wrong number.
        let base = fake_id('A', 1);
        assert!(source.l1_range(base, 10).await.unwrap_err().is_not_found());
    }

    #[rstest]
    #[tokio::test]
    async fn test_l2_by_number(mut source: FakeChainSource) {
        assert_eq!(source.l2_block_ref_by_number(None).await.unwrap().hash(), fake_hash('W'));
        assert_eq!(
            source.l2_block_ref_by_number(Some(1)).await,
            Err(FakeChainSourceError::BlockNotFound(1))
        );
        source.set_l2_head(2);
        assert_eq!(source.l2_block_ref_by_number(None).await.unwrap().hash(), fake_hash('Y'));
        assert_eq!(source.l2_block_ref_by_number(Some(1)).await.unwrap().hash(), fake_hash('X'));
    }

    #[tokio::test]
    #[should_panic(expected = "bad test, no l2 chain")]
    async fn test_l2_by_number_empty_branch() {
        let mut source = FakeChainSource::new(&["AB"], &[""], 0);
        let _ = source.l2_block_ref_by_number(None).await;
    }

    #[rstest]
    #[tokio::test]
    async fn test_l2_by_hash(mut source: FakeChainSource) {
        assert_eq!(
            source.l2_block_ref_by_hash(fake_hash('Y')).await,
            Err(FakeChainSourceError::BlockNotFound(2))
        );
        source.set_l2_head(3);
        let block = source.l2_block_ref_by_hash(fake_hash('Y')).await.unwrap();
        assert_eq!(block.number(), 2);
        assert_eq!(block.l1_origin, fake_id('C', 2));
        assert_eq!(
            source.l2_block_ref_by_hash(fake_hash('Q')).await,
            Err(FakeChainSourceError::HashNotFound(fake_hash('Q')))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_forkchoice_update(mut source: FakeChainSource) {
        let updated = source.forkchoice_update(head('Q'), None).await.unwrap();
        assert_eq!(updated.payload_status.status, PayloadStatusEnum::Valid);
        assert_eq!(updated.payload_status.latest_valid_hash, Some(fake_hash('Q')));
        assert_eq!(source.l2_reorg_index(), 1);
        assert_eq!(source.l2_head_index(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_forkchoice_update_unknown_head(mut source: FakeChainSource) {
        source.set_l2_head(1);
        // 'Y' only exists on the first L2 branch.
        let err = source.forkchoice_update(head('Y'), None).await.unwrap_err();
        assert_eq!(err, FakeChainSourceError::UnknownHead(fake_hash('Y')));
        assert_eq!(source.l2_reorg_index(), 1);
        assert_eq!(source.l2_head_index(), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "bad test, L2 index 3 is past the end of L2 branch 1")]
    async fn test_l2_read_after_failed_forkchoice_onto_shorter_branch() {
        let mut source = FakeChainSource::new(&["ABCD", "ABCD"], &["WXYZ", "WX"], 0);
        source.set_l2_head(3);
        // 'Q' is not on the second branch, so the head index stays at 3.
        let err = source.forkchoice_update(head('Q'), None).await.unwrap_err();
        assert_eq!(err, FakeChainSourceError::UnknownHead(fake_hash('Q')));
        let _ = source.l2_block_ref_by_number(None).await;
    }

    #[rstest]
    #[tokio::test]
    #[should_panic(expected = "No more re-org chains available")]
    async fn test_forkchoice_update_exhausted(mut source: FakeChainSource) {
        source.forkchoice_update(head('W'), None).await.unwrap();
        let _ = source.forkchoice_update(head('W'), None).await;
    }
}
