//! Log-magnitude histogram — Error distribution over decades
//!
//! Buckets absolute error magnitudes into logarithmically spaced bins so
//! that errors spanning many orders of magnitude remain readable on one
//! axis. The edges cover `[10^min_exp, 10^max_exp]`; magnitudes below the
//! lower edge (including exact zero) land in bucket 0, magnitudes at or
//! above the upper edge land in the last bucket. Every recorded sample is
//! counted exactly once.
//!
//! ## Example
//!
//! ```rust
//! use ropeq_core::log_hist::LogHistogram;
//!
//! let mut hist = LogHistogram::standard(); // [1e-12, 1], 24 bins
//! hist.record(0.0);
//! hist.record(1e-6);
//! hist.record(0.5);
//! hist.record(10.0); // above range: last bucket
//! assert_eq!(hist.total(), 4);
//! ```

use serde::{Deserialize, Serialize};

/// One histogram bucket with its `[low, high)` magnitude range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistBucket {
    /// Inclusive lower magnitude edge.
    pub low: f64,
    /// Exclusive upper magnitude edge.
    pub high: f64,
    /// Samples counted in this bucket.
    pub count: u64,
}

/// Histogram over logarithmically spaced magnitude bins.
#[derive(Debug, Clone)]
pub struct LogHistogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
    total: u64,
}

impl LogHistogram {
    /// Create a histogram with `bins` equal log-width bins spanning
    /// `[10^min_exp, 10^max_exp]`.
    pub fn new(min_exp: f64, max_exp: f64, bins: usize) -> Self {
        let bins = bins.max(1);
        let edges = (0..=bins)
            .map(|i| {
                let t = i as f64 / bins as f64;
                10f64.powf(min_exp + (max_exp - min_exp) * t)
            })
            .collect();
        Self {
            edges,
            counts: vec![0; bins],
            total: 0,
        }
    }

    /// The engine's standard range: `[1e-12, 1]` in 24 bins.
    pub fn standard() -> Self {
        Self::new(-12.0, 0.0, 24)
    }

    /// Bucket index for a positive magnitude.
    pub fn bin_index(&self, x: f64) -> usize {
        let last = self.counts.len() - 1;
        if x < self.edges[0] {
            return 0;
        }
        if x >= self.edges[self.edges.len() - 1] {
            return last;
        }
        self.edges.partition_point(|&e| e <= x) - 1
    }

    /// Count one magnitude. Zero (and anything non-positive) lands in
    /// bucket 0.
    #[inline]
    pub fn record(&mut self, magnitude: f64) {
        let bin = if magnitude > 0.0 {
            self.bin_index(magnitude)
        } else {
            0
        };
        self.counts[bin] += 1;
        self.total += 1;
    }

    /// Number of bins.
    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    /// Raw bin counts.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Bin edges (length `num_bins + 1`).
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Total samples recorded.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Snapshot the buckets with their edge ranges, for labeling.
    pub fn buckets(&self) -> Vec<HistBucket> {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| HistBucket {
                low: self.edges[i],
                high: self.edges[i + 1],
                count,
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
