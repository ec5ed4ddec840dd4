//! Deterministic Sampler — Seeded bipolar test-signal source
//!
//! Generates pseudo-random values in `[-1, 1]` from a 31-bit linear
//! congruential recurrence. The same seed always reproduces the identical
//! sequence, which makes quantization error measurements repeatable:
//! two runs over the same configuration see exactly the same synthetic
//! input and therefore produce bit-identical statistics.
//!
//! The recurrence is `state = (state * 1103515245 + 12345) mod 2^31`
//! (the classic C `rand()` constants), with the output mapped to
//! `2 * state / (2^31 - 1) - 1`.
//!
//! ## Example
//!
//! ```rust
//! use ropeq_core::sampler::LcgSampler;
//!
//! let mut a = LcgSampler::new(42);
//! let mut b = LcgSampler::new(42);
//! for _ in 0..100 {
//!     let x = a.next_f64();
//!     assert_eq!(x, b.next_f64());
//!     assert!((-1.0..=1.0).contains(&x));
//! }
//! ```

use num_complex::Complex64;

const LCG_MUL: u32 = 1_103_515_245;
const LCG_INC: u32 = 12_345;
const LCG_MASK: u32 = 0x7fff_ffff;

/// Seeded pseudo-random source producing values in `[-1, 1]`.
///
/// Restartable only by reseeding: construct a new sampler with the same
/// seed to replay a sequence from the beginning.
#[derive(Debug, Clone)]
pub struct LcgSampler {
    state: u32,
}

impl LcgSampler {
    /// Create a sampler from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance the recurrence and return the next value in `[-1, 1]`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MUL)
            .wrapping_add(LCG_INC)
            & LCG_MASK;
        (self.state as f64 / LCG_MASK as f64) * 2.0 - 1.0
    }

    /// Draw a 2-component pair as a complex number.
    ///
    /// The real component is drawn first, then the imaginary one; the
    /// draw order is part of the reproducibility contract.
    #[inline]
    pub fn next_pair(&mut self) -> Complex64 {
        let re = self.next_f64();
        let im = self.next_f64();
        Complex64::new(re, im)
    }

    /// Fill a buffer with consecutive samples.
    pub fn fill(&mut self, out: &mut [f64]) {
        for slot in out {
            *slot = self.next_f64();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
