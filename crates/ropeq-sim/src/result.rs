//! Published run output
//!
//! A [`RunResult`] is created atomically when a run completes its last
//! chunk; a superseded run never publishes one, so consumers only ever
//! observe whole results. The structure is what the rendering layer
//! charts: headline statistics per scheme, a subsampled error-vs-position
//! series, and the log-magnitude error histogram with labeled bucket
//! edges.

use serde::{Deserialize, Serialize};

pub use ropeq_core::log_hist::HistBucket;
pub use ropeq_core::stats::SchemeStats;

use crate::config::RunConfig;

/// One subsampled point of the error-vs-position series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Sequence position.
    pub pos: usize,
    /// Per-position RMSE of the log-domain scheme.
    pub rmse_log: f64,
    /// Per-position RMSE of the naive baseline, when computed.
    pub rmse_naive: Option<f64>,
}

/// Complete output of one finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// The configuration this result was computed under.
    pub config: RunConfig,
    /// Log-domain scheme statistics.
    pub stats_log: SchemeStats,
    /// Naive linear baseline statistics, when requested.
    pub stats_naive: Option<SchemeStats>,
    /// Subsampled error-vs-position series (~200 points).
    pub chart: Vec<ChartPoint>,
    /// Log-domain error-magnitude histogram with `[low, high)` edges.
    pub hist: Vec<HistBucket>,
}

// ============================================================================
// Tests
// ============================================================================
