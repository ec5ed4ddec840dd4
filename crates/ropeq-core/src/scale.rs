//! Scale Calculator — Analytic quantization step sizes
//!
//! Derives the quantization step per channel from the known angle bounds
//! instead of scanning data. For a fixed `(seq_len, base, dim)` the
//! rotation angle range of every channel is fully determined, so the
//! step can be computed in closed form and is identical for any input
//! distribution — no calibration pass required.
//!
//! Two calculators share the same contract:
//!
//! - **Log-domain**: the quantized quantity is `ln(pos) + ln(inv_freq[i])`,
//!   which sweeps `[ln(inv_freq[i]), ln(inv_freq[i]) + ln(max(1, N-1))]`
//!   for positions `1..N` (position 0 is an identity-rotation special
//!   case handled at simulation time, so it does not enter the range).
//! - **Linear**: the quantized quantity is the raw angle
//!   `pos * inv_freq[i]`, which sweeps `[0, (N-1) * inv_freq[i]]`.
//!
//! In [`QuantMode::Global`] one shared step covers all channels: the
//! per-channel maximum (log-domain) or channel 0 (linear — `inv_freq` is
//! monotonically decreasing, so channel 0 dominates). The global step is
//! therefore always at least as large as any per-channel step.
//!
//! ## Example
//!
//! ```rust
//! use ropeq_core::freq::FrequencyTable;
//! use ropeq_core::scale::{QuantMode, ScaleTable};
//!
//! let freq = FrequencyTable::new(64, 10000.0);
//! let per = ScaleTable::log_domain(4096, &freq, 8, QuantMode::PerChannel);
//! let global = ScaleTable::log_domain(4096, &freq, 8, QuantMode::Global);
//! for i in 0..freq.half() {
//!     assert!(global.scale(i) >= per.scale(i));
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::freq::FrequencyTable;
use crate::quantizer::qmax_for_bits;

/// Substituted step when the natural angle range is numerically
/// negligible, to keep every stored scale strictly positive.
const MIN_RANGE: f64 = 1e-12;

/// Quantization granularity: one step per channel, or one shared step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantMode {
    /// Each channel gets a step fitted to its own angle range.
    PerChannel,
    /// One step, sized for the worst-case channel, shared by all.
    Global,
}

/// Per-channel quantization steps for one scheme.
///
/// Invariant: every stored scale is strictly positive and finite.
#[derive(Debug, Clone)]
pub struct ScaleTable {
    scales: Vec<f64>,
}

impl ScaleTable {
    /// Steps for the log-domain scheme.
    pub fn log_domain(
        seq_len: usize,
        freq: &FrequencyTable,
        bits: u32,
        mode: QuantMode,
    ) -> Self {
        let qmax = qmax_for_bits(bits) as f64;
        let log_max_pos = (seq_len.saturating_sub(1).max(1) as f64).ln();
        let half = freq.half();

        let scales = match mode {
            QuantMode::Global => {
                let mut max_abs = 0.0f64;
                for &lif in freq.log_inv_freq() {
                    let lo = lif;
                    let hi = lif + log_max_pos;
                    max_abs = max_abs.max(lo.abs()).max(hi.abs());
                }
                vec![step_for(max_abs, qmax); half]
            }
            QuantMode::PerChannel => freq
                .log_inv_freq()
                .iter()
                .map(|&lif| {
                    let lo = lif;
                    let hi = lif + log_max_pos;
                    step_for(lo.abs().max(hi.abs()), qmax)
                })
                .collect(),
        };
        Self { scales }
    }

    /// Steps for the naive linear scheme.
    pub fn linear(seq_len: usize, freq: &FrequencyTable, bits: u32, mode: QuantMode) -> Self {
        let qmax = qmax_for_bits(bits) as f64;
        let max_pos = seq_len.saturating_sub(1).max(1) as f64;
        let half = freq.half();

        let scales = match mode {
            QuantMode::Global => {
                // inv_freq is monotonically decreasing: channel 0 dominates.
                let max_abs = freq.inv_freq().first().map_or(0.0, |&v| max_pos * v);
                vec![step_for(max_abs, qmax); half]
            }
            QuantMode::PerChannel => freq
                .inv_freq()
                .iter()
                .map(|&v| step_for(max_pos * v, qmax))
                .collect(),
        };
        Self { scales }
    }

    /// Step for one channel.
    #[inline]
    pub fn scale(&self, channel: usize) -> f64 {
        self.scales[channel]
    }

    /// All per-channel steps.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}

fn step_for(max_abs: f64, qmax: f64) -> f64 {
    if max_abs < MIN_RANGE {
        1.0
    } else {
        max_abs / qmax
    }
}

// ============================================================================
// Tests
// ============================================================================
