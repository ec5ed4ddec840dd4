//! Simulation driver — chunked, cancelable error measurement
//!
//! A [`Run`] sweeps positions `0..N` of a synthetic rotary-embedding
//! rotation and measures, per position and channel pair, how far the
//! quantized rotation lands from the exact one. Work happens in fixed
//! size chunks: each [`Run::step`] call processes one chunk and yields
//! back to the caller, so a UI (or a newer run request) is never blocked
//! for longer than one chunk. At the top of every step the run compares
//! its id against the session's latest-issued counter and, if overtaken,
//! discards its accumulators without publishing anything.
//!
//! Per position `p` and channel `i` the inner loop:
//!
//! 1. draws a deterministic 2-component input pair,
//! 2. rotates it by the exact angle `theta = p * inv_freq[i]`,
//! 3. rotates it by the log-domain reconstruction
//!    `exp(roundtrip(ln(p) + ln(inv_freq[i])))` — position 0 is the
//!    identity rotation, since `ln(0)` does not exist,
//! 4. optionally rotates it by the naive linear reconstruction of the
//!    raw angle,
//! 5. accumulates squared error, the per-component error histogram, and
//!    per-position RMSE statistics.
//!
//! ## Example
//!
//! ```rust
//! use ropeq_sim::{run_once, RunConfig};
//!
//! let result = run_once(RunConfig {
//!     seq_len: 512,
//!     dim: 16,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! assert!(result.stats_log.mean_rmse >= 0.0);
//! assert!(result.stats_naive.is_some());
//! // Every error component was histogrammed exactly once.
//! let total: u64 = result.hist.iter().map(|b| b.count).sum();
//! assert_eq!(total, 512 * 16);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use num_complex::Complex64;
use tracing::debug;

use ropeq_core::freq::FrequencyTable;
use ropeq_core::log_hist::LogHistogram;
use ropeq_core::quantizer::SignedQuantizer;
use ropeq_core::sampler::LcgSampler;
use ropeq_core::scale::ScaleTable;
use ropeq_core::stats::RmseAccumulator;

use crate::config::{ConfigError, RunConfig};
use crate::result::{ChartPoint, RunResult};
use crate::session::Session;

/// Positions processed per step. Bounds cancellation latency to one
/// chunk's worth of work.
pub const DEFAULT_CHUNK_SIZE: usize = 128;

/// Target number of chart points; the series is subsampled at stride
/// `max(1, seq_len / CHART_POINTS)`.
const CHART_POINTS: usize = 200;

/// Outcome of one [`Run::step`] call.
#[derive(Debug)]
pub enum StepState {
    /// More chunks remain; `progress` is 0..=100.
    Running { progress: u8 },
    /// The last chunk finished; the result is published exactly once.
    Completed(RunResult),
    /// A newer run was issued; accumulators were discarded, nothing is
    /// published. A run stays in this state once reached.
    Superseded,
}

/// Accumulators owned exclusively by one run.
#[derive(Debug)]
struct Accum {
    stats_log: RmseAccumulator,
    stats_naive: RmseAccumulator,
    hist: LogHistogram,
    chart: Vec<ChartPoint>,
}

impl Accum {
    fn new(seq_len: usize) -> Self {
        Self {
            stats_log: RmseAccumulator::new(seq_len),
            stats_naive: RmseAccumulator::new(seq_len),
            hist: LogHistogram::standard(),
            chart: Vec::new(),
        }
    }

    fn into_result(self, config: &RunConfig) -> RunResult {
        RunResult {
            config: config.clone(),
            stats_log: self.stats_log.finalize(),
            stats_naive: config
                .naive_baseline
                .then(|| self.stats_naive.finalize()),
            chart: self.chart,
            hist: self.hist.buckets(),
        }
    }
}

/// One in-flight simulation run.
///
/// Created by [`Session::issue`]; stepped by the caller's scheduler.
#[derive(Debug)]
pub struct Run {
    id: u64,
    latest: Arc<AtomicU64>,
    config: RunConfig,
    chunk_size: usize,
    freq: FrequencyTable,
    scales_log: ScaleTable,
    scales_lin: ScaleTable,
    quant: SignedQuantizer,
    sampler: LcgSampler,
    chart_stride: usize,
    pos: usize,
    /// `None` once the run reached a terminal state.
    acc: Option<Accum>,
}

impl Run {
    pub(crate) fn new(
        id: u64,
        latest: Arc<AtomicU64>,
        config: RunConfig,
        chunk_size: usize,
    ) -> Self {
        let freq = FrequencyTable::new(config.dim, config.base);
        let scales_log =
            ScaleTable::log_domain(config.seq_len, &freq, config.bits, config.mode);
        let scales_lin = ScaleTable::linear(config.seq_len, &freq, config.bits, config.mode);
        let quant = SignedQuantizer::new(config.bits);
        let sampler = LcgSampler::new(config.seed);
        let chart_stride = (config.seq_len / CHART_POINTS).max(1);
        let acc = Some(Accum::new(config.seq_len));
        Self {
            id,
            latest,
            config,
            chunk_size,
            freq,
            scales_log,
            scales_lin,
            quant,
            sampler,
            chart_stride,
            pos: 0,
            acc,
        }
    }

    /// This run's id, as issued by the session.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Completed positions as an integer percentage 0..=100.
    pub fn progress(&self) -> u8 {
        ((self.pos as f64 / self.config.seq_len as f64) * 100.0).round() as u8
    }

    /// Process one chunk and yield.
    ///
    /// The staleness check happens before any chunk work, so a run that
    /// was overtaken while parked never touches its accumulators again.
    pub fn step(&mut self) -> StepState {
        if self.latest.load(Ordering::SeqCst) != self.id {
            if self.acc.take().is_some() {
                debug!(run_id = self.id, pos = self.pos, "run superseded, discarding");
            }
            return StepState::Superseded;
        }
        let Some(acc) = self.acc.as_mut() else {
            // Already terminal (completed earlier); nothing to publish.
            return StepState::Superseded;
        };

        let end = (self.pos + self.chunk_size).min(self.config.seq_len);
        for pos in self.pos..end {
            simulate_position(
                pos,
                &self.config,
                &self.freq,
                &self.scales_log,
                &self.scales_lin,
                &self.quant,
                self.chart_stride,
                &mut self.sampler,
                acc,
            );
        }
        self.pos = end;

        if self.pos == self.config.seq_len {
            let Some(acc) = self.acc.take() else {
                return StepState::Superseded;
            };
            let result = acc.into_result(&self.config);
            debug!(
                run_id = self.id,
                mean_rmse = result.stats_log.mean_rmse,
                "run completed"
            );
            return StepState::Completed(result);
        }
        StepState::Running {
            progress: self.progress(),
        }
    }

    /// Drive [`step`](Self::step) to a terminal state.
    ///
    /// Returns `None` when the run was superseded.
    pub fn run_to_completion(mut self) -> Option<RunResult> {
        loop {
            match self.step() {
                StepState::Running { .. } => {}
                StepState::Completed(result) => return Some(result),
                StepState::Superseded => return None,
            }
        }
    }

    /// Like [`run_to_completion`](Self::run_to_completion), invoking
    /// `progress` with each percentage as chunks finish (including the
    /// final 100).
    pub fn run_with_progress(
        mut self,
        mut progress: impl FnMut(u8),
    ) -> Option<RunResult> {
        loop {
            match self.step() {
                StepState::Running { progress: p } => progress(p),
                StepState::Completed(result) => {
                    progress(100);
                    return Some(result);
                }
                StepState::Superseded => return None,
            }
        }
    }
}

/// Validate, run synchronously to completion, and return the result.
///
/// Convenience for callers without their own scheduler; the run cannot
/// be superseded because its session is private.
pub fn run_once(config: RunConfig) -> Result<RunResult, ConfigError> {
    let session = Session::new();
    let mut run = session.issue(config)?;
    loop {
        match run.step() {
            StepState::Running { .. } => {}
            StepState::Completed(result) => return Ok(result),
            StepState::Superseded => {
                unreachable!("private session never issues a second run")
            }
        }
    }
}

/// One position of the inner loop: all channel pairs, both schemes.
#[allow(clippy::too_many_arguments)]
fn simulate_position(
    pos: usize,
    config: &RunConfig,
    freq: &FrequencyTable,
    scales_log: &ScaleTable,
    scales_lin: &ScaleTable,
    quant: &SignedQuantizer,
    chart_stride: usize,
    sampler: &mut LcgSampler,
    acc: &mut Accum,
) {
    let dim_even = freq.dim_even() as f64;
    let log_pos = if pos == 0 { 0.0 } else { (pos as f64).ln() };
    let mut sum_sq_log = 0.0;
    let mut sum_sq_naive = 0.0;

    for i in 0..freq.half() {
        let x = sampler.next_pair();
        let theta = pos as f64 * freq.inv_freq()[i];
        let y_ref = x * Complex64::from_polar(1.0, theta);

        // Position 0 maps to the identity rotation; ln(0) is undefined,
        // so the log scheme special-cases it rather than erroring.
        let theta_log = if pos == 0 {
            0.0
        } else {
            let log_theta = log_pos + freq.log_inv_freq()[i];
            quant.roundtrip(log_theta, scales_log.scale(i)).exp()
        };
        let d = x * Complex64::from_polar(1.0, theta_log) - y_ref;
        sum_sq_log += d.norm_sqr();
        acc.hist.record(d.re.abs());
        acc.hist.record(d.im.abs());

        if config.naive_baseline {
            let theta_lin = quant.roundtrip(theta, scales_lin.scale(i));
            let dn = x * Complex64::from_polar(1.0, theta_lin) - y_ref;
            sum_sq_naive += dn.norm_sqr();
        }
    }

    let rmse_log = (sum_sq_log / dim_even).sqrt();
    acc.stats_log.observe(pos, rmse_log);

    let rmse_naive = if config.naive_baseline {
        let rmse = (sum_sq_naive / dim_even).sqrt();
        acc.stats_naive.observe(pos, rmse);
        Some(rmse)
    } else {
        None
    };

    if pos % chart_stride == 0 {
        acc.chart.push(ChartPoint {
            pos,
            rmse_log,
            rmse_naive,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ropeq_core::scale::QuantMode;

    fn config(seq_len: usize, dim: usize, bits: u32, mode: QuantMode) -> RunConfig {
        RunConfig {
            seq_len,
            dim,
            bits,
            mode,
            ..Default::default()
        }
    }

    // -------------------------------------------------------------- position 0

    #[test]
    fn test_single_position_is_exact() {
        // N=1, D=2: one channel, inv_freq[0] = 1, only the identity
        // rotation is simulated.
        let result = run_once(config(1, 2, 8, QuantMode::PerChannel)).unwrap();
        assert_eq!(result.stats_log.mean_rmse, 0.0);
        assert_eq!(result.stats_log.max_rmse, 0.0);
        assert_eq!(result.chart.len(), 1);
        assert_eq!(result.chart[0].pos, 0);
        assert_eq!(result.chart[0].rmse_log, 0.0);
    }

    #[test]
    fn test_position_zero_exact_for_any_seed() {
        for seed in [0u32, 1, 42, 0xdead_beef] {
            let result = run_once(RunConfig {
                seed,
                ..config(64, 16, 4, QuantMode::Global)
            })
            .unwrap();
            // Chart stride is 1 for short sequences, so position 0 is present.
            let p0 = result.chart.iter().find(|p| p.pos == 0).unwrap();
            assert_eq!(p0.rmse_log, 0.0, "seed {}", seed);
        }
    }

    // -------------------------------------------------------------- determinism

    #[test]
    fn test_reproducible_bit_identical() {
        let c = RunConfig {
            seed: 42,
            ..config(100, 4, 2, QuantMode::Global)
        };
        let a = run_once(c.clone()).unwrap();
        let b = run_once(c).unwrap();
        assert_eq!(a, b);
    }

    // -------------------------------------------------------------- histogram

    #[test]
    fn test_histogram_conservation() {
        // Two components per channel pair per position.
        let result = run_once(config(100, 8, 8, QuantMode::PerChannel)).unwrap();
        let total: u64 = result.hist.iter().map(|b| b.count).sum();
        assert_eq!(total, 100 * (8 / 2) * 2);
    }

    #[test]
    fn test_histogram_conservation_odd_dim() {
        // dim 9 truncates to 8.
        let result = run_once(config(50, 9, 8, QuantMode::PerChannel)).unwrap();
        let total: u64 = result.hist.iter().map(|b| b.count).sum();
        assert_eq!(total, 50 * (8 / 2) * 2);
    }

    // -------------------------------------------------------------- monotonicity

    #[test]
    fn test_fewer_bits_never_reduces_error() {
        for mode in [QuantMode::PerChannel, QuantMode::Global] {
            let fine = run_once(config(512, 32, 8, mode)).unwrap();
            let coarse = run_once(config(512, 32, 2, mode)).unwrap();
            assert!(coarse.stats_log.mean_rmse >= fine.stats_log.mean_rmse);
            let (fine_n, coarse_n) = (
                fine.stats_naive.unwrap(),
                coarse.stats_naive.unwrap(),
            );
            assert!(coarse_n.mean_rmse >= fine_n.mean_rmse);
        }
    }

    #[test]
    fn test_drift_non_negative() {
        let result = run_once(config(256, 16, 3, QuantMode::Global)).unwrap();
        assert!(result.stats_log.drift >= 0.0);
        assert!(result.stats_naive.unwrap().drift >= 0.0);
    }

    // -------------------------------------------------------------- baseline flag

    #[test]
    fn test_naive_baseline_optional() {
        let result = run_once(RunConfig {
            naive_baseline: false,
            ..config(128, 8, 8, QuantMode::PerChannel)
        })
        .unwrap();
        assert!(result.stats_naive.is_none());
        assert!(result.chart.iter().all(|p| p.rmse_naive.is_none()));
    }

    #[test]
    fn test_baseline_flag_does_not_change_log_stats() {
        // The sampler draw order is independent of the baseline flag.
        let with = run_once(config(200, 8, 6, QuantMode::PerChannel)).unwrap();
        let without = run_once(RunConfig {
            naive_baseline: false,
            ..config(200, 8, 6, QuantMode::PerChannel)
        })
        .unwrap();
        assert_eq!(with.stats_log, without.stats_log);
    }

    // -------------------------------------------------------------- chunking

    #[test]
    fn test_progress_monotone_and_complete() {
        let session = Session::new();
        let mut run = session.issue(config(1000, 8, 8, QuantMode::Global)).unwrap();
        let mut last = 0u8;
        loop {
            match run.step() {
                StepState::Running { progress } => {
                    assert!(progress >= last);
                    assert!(progress <= 100);
                    last = progress;
                }
                StepState::Completed(_) => break,
                StepState::Superseded => panic!("nothing superseded this run"),
            }
        }
    }

    #[test]
    fn test_run_with_progress_ends_at_hundred() {
        let session = Session::new();
        let run = session.issue(config(500, 8, 8, QuantMode::Global)).unwrap();
        let mut seen = Vec::new();
        let result = run.run_with_progress(|p| seen.push(p));
        assert!(result.is_some());
        assert_eq!(*seen.last().unwrap(), 100);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_chunk_count_matches_chunk_size() {
        // N=300, chunk 128 -> running, running, completed.
        let session = Session::new();
        let mut run = session.issue(config(300, 4, 8, QuantMode::Global)).unwrap();
        assert!(matches!(run.step(), StepState::Running { progress: 43 }));
        assert!(matches!(run.step(), StepState::Running { progress: 85 }));
        assert!(matches!(run.step(), StepState::Completed(_)));
    }

    // -------------------------------------------------------------- chart

    #[test]
    fn test_chart_subsampling_stride() {
        // N=4000 -> stride 20 -> 200 points at positions 0, 20, 40, ...
        let result = run_once(config(4000, 4, 8, QuantMode::Global)).unwrap();
        assert_eq!(result.chart.len(), 200);
        assert!(result.chart.iter().all(|p| p.pos % 20 == 0));
    }

    // -------------------------------------------------------------- schemes

    #[test]
    fn test_both_schemes_produce_finite_stats() {
        let result = run_once(config(2048, 32, 8, QuantMode::PerChannel)).unwrap();
        let naive = result.stats_naive.unwrap();
        for stats in [result.stats_log, naive] {
            assert!(stats.mean_rmse.is_finite() && stats.mean_rmse >= 0.0);
            assert!(stats.max_rmse >= stats.mean_rmse);
            assert!(stats.first_decile >= 0.0 && stats.last_decile >= 0.0);
            assert!(stats.drift >= 0.0);
        }
    }

    #[test]
    fn test_global_mode_error_at_least_per_channel() {
        // A global step is never finer than any per-channel step. Both
        // runs see identical sampler inputs, so the aggregate error
        // cannot meaningfully shrink when switching to global mode.
        let per = run_once(config(512, 32, 4, QuantMode::PerChannel)).unwrap();
        let global = run_once(config(512, 32, 4, QuantMode::Global)).unwrap();
        assert!(global.stats_log.mean_rmse >= per.stats_log.mean_rmse * 0.9);
    }
}
