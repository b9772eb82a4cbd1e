//! Metrics for the fake chain source.

/// Container for metrics.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the counter that tracks chain source queries.
    pub const QUERIES: &str = "opsim_fake_chain_queries";

    /// Identifier for the counter that tracks queries answered with a not found error.
    pub const NOT_FOUND: &str = "opsim_fake_chain_not_found";

    /// Identifier for the counter that tracks L1 reorgs.
    pub const L1_REORGS: &str = "opsim_fake_chain_l1_reorgs";

    /// Identifier for the counter that tracks forkchoice updates.
    pub const FORKCHOICE_UPDATES: &str = "opsim_fake_chain_forkchoice_updates";

    /// Identifier for the gauge that tracks the L1 head index.
    pub const L1_HEAD: &str = "opsim_fake_chain_l1_head";

    /// Identifier for the gauge that tracks the L2 head index.
    pub const L2_HEAD: &str = "opsim_fake_chain_l2_head";

    /// Initializes metrics for the fake chain source.
    ///
    /// This does two things:
    /// * Describes various metrics.
    /// * Initializes metrics to 0 so they can be queried immediately.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    /// Describes metrics used in [`opsim_providers_fake`][crate].
    pub fn describe() {
        metrics::describe_counter!(Self::QUERIES, "Number of chain source queries");
        metrics::describe_counter!(
            Self::NOT_FOUND,
            "Number of chain source queries answered with not found"
        );
        metrics::describe_counter!(Self::L1_REORGS, "Number of L1 reorgs triggered");
        metrics::describe_counter!(
            Self::FORKCHOICE_UPDATES,
            "Number of forkchoice updates, by status"
        );
        metrics::describe_gauge!(Self::L1_HEAD, "Index of the L1 head on the active branch");
        metrics::describe_gauge!(Self::L2_HEAD, "Index of the L2 head on the active branch");
    }

    /// Initializes metrics to `0` so they can be queried immediately by consumers of prometheus
    /// metrics.
    pub fn zero() {
        metrics::counter!(Self::L1_REORGS).absolute(0);
        metrics::counter!(Self::FORKCHOICE_UPDATES, "status" => "valid").absolute(0);
        metrics::counter!(Self::FORKCHOICE_UPDATES, "status" => "unknown_head").absolute(0);
        metrics::gauge!(Self::L1_HEAD).set(0.0);
        metrics::gauge!(Self::L2_HEAD).set(0.0);
    }

    /// Records a query against the chain source and whether it was answered.
    pub(crate) fn record_query(method: &'static str, not_found: bool) {
        metrics::counter!(Self::QUERIES, "method" => method).increment(1);
        if not_found {
            metrics::counter!(Self::NOT_FOUND, "method" => method).increment(1);
        }
    }
}
