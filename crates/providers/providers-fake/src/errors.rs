//! Errors returned by the [`FakeChainSource`](crate::FakeChainSource).

use alloy_eips::BlockNumHash;
use alloy_primitives::B256;
use opsim_protocol::SourceErrorKind;

/// An error returned by the [`FakeChainSource`](crate::FakeChainSource).
///
/// Misuse of the simulator, such as advancing past the end of a branch or running out of
/// prepared branches, is a broken test and panics instead of surfacing here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FakeChainSourceError {
    /// The block at the given number is past the current head.
    #[error("block {0} not found")]
    BlockNotFound(u64),
    /// No block with the given hash is known on the active branch.
    #[error("block {0} not found")]
    HashNotFound(B256),
    /// The active branch has no blocks.
    #[error("no blocks on the active branch")]
    EmptyChain,
    /// The range base is not part of the active branch up to the current head.
    #[error("range base {} at {} not found", .0.hash, .0.number)]
    RangeBaseNotFound(BlockNumHash),
    /// The forkchoice head is not part of the newly active L2 branch.
    #[error("unable to set new head {0}")]
    UnknownHead(B256),
}

impl FakeChainSourceError {
    /// Returns `true` if the error means the requested data is not (yet) available.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BlockNotFound(_) |
                Self::HashNotFound(_) |
                Self::EmptyChain |
                Self::RangeBaseNotFound(_)
        )
    }
}

impl From<FakeChainSourceError> for SourceErrorKind {
    fn from(err: FakeChainSourceError) -> Self {
        if err.is_not_found() {
            Self::Temporary(err.to_string())
        } else {
            Self::Critical(err.to_string())
        }
    }
}
