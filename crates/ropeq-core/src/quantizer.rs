//! Quantizer — Symmetric signed scalar quantization
//!
//! Maps a real value to a bounded signed integer code and back, given a
//! step size (`scale`) and a bit-width-derived clamp bound
//! (`qmax = 2^(bits-1) - 1`). Round-trip error is bounded by `scale / 2`
//! by construction of rounding, except where clamping occurs; clamping is
//! the lossy-compression behavior under measurement, not a fault, and is
//! detectable because the returned code sits at `±qmax`.
//!
//! ## Example
//!
//! ```rust
//! use ropeq_core::quantizer::SignedQuantizer;
//!
//! let q = SignedQuantizer::new(8);
//! assert_eq!(q.qmax(), 127);
//!
//! let scale = 0.01;
//! let code = q.quantize(0.4237, scale);
//! let back = q.dequantize(code, scale);
//! assert!((back - 0.4237).abs() <= scale / 2.0);
//! ```

/// Largest representable code magnitude for a signed bit width.
pub fn qmax_for_bits(bits: u32) -> i64 {
    (1i64 << (bits - 1)) - 1
}

/// Symmetric signed quantizer with range `[-qmax, qmax]`.
#[derive(Debug, Clone, Copy)]
pub struct SignedQuantizer {
    qmax: i64,
}

impl SignedQuantizer {
    /// Create a quantizer for the given bit width.
    ///
    /// * `bits` – signed bit width (2..=32); 2 bits is the smallest width
    ///   with a nonzero code range.
    pub fn new(bits: u32) -> Self {
        assert!((2..=32).contains(&bits), "bits must be in 2..=32");
        Self {
            qmax: qmax_for_bits(bits),
        }
    }

    /// Clamp bound of the code range.
    pub fn qmax(&self) -> i64 {
        self.qmax
    }

    /// Quantize a value to a signed code.
    ///
    /// Non-finite values and degenerate scales (non-finite or `<= 0`)
    /// quantize to code 0 rather than erroring; numeric degeneracy is
    /// absorbed here so the simulation loop never branches on it.
    #[inline]
    pub fn quantize(&self, value: f64, scale: f64) -> i64 {
        if !value.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return 0;
        }
        let code = (value / scale).round() as i64;
        code.clamp(-self.qmax, self.qmax)
    }

    /// Reconstruct a value from a code.
    #[inline]
    pub fn dequantize(&self, code: i64, scale: f64) -> f64 {
        code as f64 * scale
    }

    /// Quantize and immediately reconstruct.
    #[inline]
    pub fn roundtrip(&self, value: f64, scale: f64) -> f64 {
        self.dequantize(self.quantize(value, scale), scale)
    }
}

// ============================================================================
// Tests
// ============================================================================
