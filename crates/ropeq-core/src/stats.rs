//! RMSE statistics — Running per-position error summary
//!
//! Accumulates one RMSE value per sequence position into the summary a
//! completed run publishes: mean, maximum, first/last-decile means, and
//! the drift ratio (last-decile mean over first-decile mean). Drift above
//! 1 means the error grows along the sequence; this is the headline
//! figure separating the log-domain scheme from the naive baseline.
//!
//! ## Example
//!
//! ```rust
//! use ropeq_core::stats::RmseAccumulator;
//!
//! let mut acc = RmseAccumulator::new(100);
//! for pos in 0..100 {
//!     acc.observe(pos, pos as f64 * 0.01); // linearly growing error
//! }
//! let stats = acc.finalize();
//! assert!(stats.drift > 1.0);
//! assert!((stats.mean_rmse - 0.495).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Guards the drift denominator against a zero first-decile mean.
const DRIFT_EPS: f64 = 1e-12;

/// Summary statistics for one quantization scheme over a full run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchemeStats {
    /// Mean per-position RMSE over the whole sequence.
    pub mean_rmse: f64,
    /// Maximum per-position RMSE.
    pub max_rmse: f64,
    /// Mean RMSE over the first 10% of positions.
    pub first_decile: f64,
    /// Mean RMSE over the last 10% of positions.
    pub last_decile: f64,
    /// `last_decile / (first_decile + eps)`; always non-negative.
    pub drift: f64,
}

/// Running accumulator feeding [`SchemeStats`].
///
/// Owned exclusively by one run; never shared across runs.
#[derive(Debug, Clone)]
pub struct RmseAccumulator {
    seq_len: usize,
    n10: usize,
    sum: f64,
    max: f64,
    sum_first: f64,
    sum_last: f64,
}

impl RmseAccumulator {
    /// Create an accumulator for a sequence of `seq_len` positions.
    pub fn new(seq_len: usize) -> Self {
        Self {
            seq_len,
            n10: (seq_len / 10).max(1),
            sum: 0.0,
            max: 0.0,
            sum_first: 0.0,
            sum_last: 0.0,
        }
    }

    /// Record the RMSE for one position.
    #[inline]
    pub fn observe(&mut self, pos: usize, rmse: f64) {
        self.sum += rmse;
        if rmse > self.max {
            self.max = rmse;
        }
        if pos < self.n10 {
            self.sum_first += rmse;
        }
        if pos + self.n10 >= self.seq_len {
            self.sum_last += rmse;
        }
    }

    /// Positions in each decile window.
    pub fn decile_len(&self) -> usize {
        self.n10
    }

    /// Produce the final summary.
    pub fn finalize(&self) -> SchemeStats {
        let n = self.seq_len.max(1) as f64;
        let n10 = self.n10 as f64;
        let first = self.sum_first / n10;
        let last = self.sum_last / n10;
        SchemeStats {
            mean_rmse: self.sum / n,
            max_rmse: self.max,
            first_decile: first,
            last_decile: last,
            drift: last / (first + DRIFT_EPS),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_max() {
        let mut acc = RmseAccumulator::new(4);
        for (pos, rmse) in [0.1, 0.2, 0.3, 0.4].iter().enumerate() {
            acc.observe(pos, *rmse);
        }
        let s = acc.finalize();
        assert!((s.mean_rmse - 0.25).abs() < 1e-15);
        assert_eq!(s.max_rmse, 0.4);
    }

    #[test]
    fn test_deciles() {
        let mut acc = RmseAccumulator::new(100);
        for pos in 0..100 {
            acc.observe(pos, pos as f64);
        }
        let s = acc.finalize();
        // First decile: positions 0..10, mean 4.5; last: 90..100, mean 94.5
        assert!((s.first_decile - 4.5).abs() < 1e-12);
        assert!((s.last_decile - 94.5).abs() < 1e-12);
        assert!(s.drift > 1.0);
    }

    #[test]
    fn test_short_sequence_decile_floor() {
        // seq_len < 10: the decile window is a single position.
        let mut acc = RmseAccumulator::new(3);
        acc.observe(0, 1.0);
        acc.observe(1, 2.0);
        acc.observe(2, 3.0);
        assert_eq!(acc.decile_len(), 1);
        let s = acc.finalize();
        assert_eq!(s.first_decile, 1.0);
        assert_eq!(s.last_decile, 3.0);
    }

    #[test]
    fn test_drift_non_negative_for_zero_error() {
        let mut acc = RmseAccumulator::new(50);
        for pos in 0..50 {
            acc.observe(pos, 0.0);
        }
        let s = acc.finalize();
        assert_eq!(s.mean_rmse, 0.0);
        assert!(s.drift >= 0.0);
    }

    #[test]
    fn test_growing_error_drift_at_least_one() {
        let mut acc = RmseAccumulator::new(200);
        for pos in 0..200 {
            acc.observe(pos, 1.0 + pos as f64 * 0.05);
        }
        let s = acc.finalize();
        assert!(s.drift >= 1.0);
    }
}
