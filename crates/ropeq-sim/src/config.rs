//! Run configuration and structural validation
//!
//! A [`RunConfig`] is immutable for the lifetime of one run; changing a
//! parameter means issuing a new run. Validation rejects only structural
//! misconfiguration (empty sequence, dimension below one pair, unusable
//! base or bit width) — numerically awkward but well-typed values are
//! absorbed downstream by the scale floor and the quantizer clamps.

use ropeq_core::scale::QuantMode;
use serde::{Deserialize, Serialize};

/// Structural misconfiguration, rejected before a run is issued.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("sequence length must be at least 1")]
    EmptySequence,

    #[error("embedding dimension must be at least 2, got {0}")]
    DimensionTooSmall(usize),

    #[error("frequency base must be positive and finite, got {0}")]
    InvalidBase(f64),

    #[error("bit width must be in 2..=16, got {0}")]
    InvalidBits(u32),
}

/// Parameters of one simulation run.
///
/// Practical UI ranges are `seq_len` 64..=65536, `dim` 8..=256 and
/// `bits` 2..=8; the engine itself only enforces the structural bounds
/// checked by [`RunConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of sequence positions to simulate.
    pub seq_len: usize,
    /// Embedding dimension; an odd value silently drops its last channel.
    pub dim: usize,
    /// Frequency base of the rotary schedule.
    pub base: f64,
    /// Seed for the deterministic input sampler.
    pub seed: u32,
    /// Signed quantization bit width.
    pub bits: u32,
    /// Per-channel or global quantization step.
    pub mode: QuantMode,
    /// Also compute the naive linear-domain baseline.
    pub naive_baseline: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seq_len: 4096,
            dim: 64,
            base: 10000.0,
            seed: 42,
            bits: 8,
            mode: QuantMode::PerChannel,
            naive_baseline: true,
        }
    }
}

impl RunConfig {
    /// Reject structurally invalid configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seq_len == 0 {
            return Err(ConfigError::EmptySequence);
        }
        if self.dim < 2 {
            return Err(ConfigError::DimensionTooSmall(self.dim));
        }
        if !self.base.is_finite() || self.base <= 0.0 {
            return Err(ConfigError::InvalidBase(self.base));
        }
        if !(2..=16).contains(&self.bits) {
            return Err(ConfigError::InvalidBits(self.bits));
        }
        Ok(())
    }

    /// The even-truncated embedding dimension actually simulated.
    pub fn dim_even(&self) -> usize {
        self.dim & !1
    }
}

// ============================================================================
// Tests
// ============================================================================
