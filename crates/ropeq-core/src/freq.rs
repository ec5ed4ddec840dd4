//! Frequency Model — Per-channel inverse frequencies for rotary embeddings
//!
//! Rotary position embeddings rotate each 2-component channel pair by
//! `position * inv_freq[i]`, where the inverse frequency follows a
//! geometric schedule over the embedding dimension:
//!
//! ```text
//! inv_freq[i] = base^(-2i / dim)      i in [0, dim/2)
//! ```
//!
//! Channel 0 rotates fastest (`inv_freq[0] = 1`), later channels
//! progressively slower. The table also carries `ln(inv_freq[i])` so the
//! log-domain quantization path does not recompute logarithms per
//! position.
//!
//! ## Example
//!
//! ```rust
//! use ropeq_core::freq::FrequencyTable;
//!
//! let table = FrequencyTable::new(64, 10000.0);
//! assert_eq!(table.half(), 32);
//! assert_eq!(table.inv_freq()[0], 1.0);
//! // Monotonically decreasing in the channel index
//! assert!(table.inv_freq()[31] < table.inv_freq()[0]);
//! ```

/// Per-channel inverse frequency table, derived once per run.
///
/// An odd `dim` is silently truncated to the next lower even value; the
/// dropped last channel has no pair partner to rotate against.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    dim_even: usize,
    inv_freq: Vec<f64>,
    log_inv_freq: Vec<f64>,
}

impl FrequencyTable {
    /// Build the table for an embedding dimension and frequency base.
    ///
    /// `base` must be positive; the caller validates before construction.
    pub fn new(dim: usize, base: f64) -> Self {
        let dim_even = dim & !1;
        let half = dim_even / 2;
        let mut inv_freq = Vec::with_capacity(half);
        let mut log_inv_freq = Vec::with_capacity(half);
        for i in 0..half {
            let v = base.powf(-2.0 * i as f64 / dim_even as f64);
            inv_freq.push(v);
            log_inv_freq.push(v.ln());
        }
        Self {
            dim_even,
            inv_freq,
            log_inv_freq,
        }
    }

    /// Number of channel pairs (`dim_even / 2`).
    pub fn half(&self) -> usize {
        self.inv_freq.len()
    }

    /// The even-truncated embedding dimension.
    pub fn dim_even(&self) -> usize {
        self.dim_even
    }

    /// `inv_freq[i] = base^(-2i/dim)` per channel pair.
    pub fn inv_freq(&self) -> &[f64] {
        &self.inv_freq
    }

    /// `ln(inv_freq[i])` per channel pair.
    pub fn log_inv_freq(&self) -> &[f64] {
        &self.log_inv_freq
    }
}

// ============================================================================
// Tests
// ============================================================================
