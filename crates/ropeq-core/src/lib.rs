//! # RoPE Quantization Core
//!
//! Numeric building blocks for measuring how reduced-bit-width
//! quantization of rotary-position-embedding (RoPE) rotation angles
//! degrades numerical fidelity.
//!
//! Rotary embeddings rotate each 2-component channel pair of an
//! embedding by `theta = position * inv_freq[channel]`. Storing `theta`
//! in a handful of bits loses precision; storing `ln(theta)` instead
//! spends those bits logarithmically, which keeps the relative angle
//! error flat across a long sequence instead of growing with position.
//! This crate provides the pieces a simulation of that trade-off needs:
//!
//! - [`sampler`] — seeded deterministic source of synthetic inputs
//! - [`freq`] — per-channel inverse frequency table
//! - [`scale`] — analytic quantization step sizes (log-domain and linear)
//! - [`quantizer`] — symmetric signed round-and-clamp quantization
//! - [`log_hist`] — error-magnitude histogram over log-spaced bins
//! - [`stats`] — per-position RMSE summary (mean, max, deciles, drift)
//!
//! Everything here is pure computation: no I/O, no shared state, no
//! panics on degenerate numeric input (floors and clamps absorb those).
//! The chunked, cancelable simulation driver lives in `ropeq-sim`.
//!
//! ## Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use ropeq_core::freq::FrequencyTable;
//! use ropeq_core::quantizer::SignedQuantizer;
//! use ropeq_core::scale::{QuantMode, ScaleTable};
//!
//! let freq = FrequencyTable::new(64, 10000.0);
//! let scales = ScaleTable::log_domain(4096, &freq, 8, QuantMode::PerChannel);
//! let quant = SignedQuantizer::new(8);
//!
//! // Reconstruct the rotation angle of channel 3 at position 100
//! // through the log-domain code path.
//! let theta = 100.0 * freq.inv_freq()[3];
//! let log_theta = 100f64.ln() + freq.log_inv_freq()[3];
//! let back = quant.roundtrip(log_theta, scales.scale(3));
//! assert!((back - log_theta).abs() <= scales.scale(3) / 2.0);
//!
//! // The log-domain step bounds the *relative* angle error.
//! let theta_hat = back.exp();
//! assert!((theta_hat - theta).abs() / theta < 0.05);
//!
//! // Applying the reconstructed rotation still preserves magnitude.
//! let x = Complex64::new(0.7, -0.2);
//! let y = x * Complex64::from_polar(1.0, theta_hat);
//! assert!((y.norm() - x.norm()).abs() < 1e-12);
//! ```

pub mod freq;
pub mod log_hist;
pub mod quantizer;
pub mod sampler;
pub mod scale;
pub mod stats;

pub use freq::FrequencyTable;
pub use log_hist::{HistBucket, LogHistogram};
pub use quantizer::{qmax_for_bits, SignedQuantizer};
pub use sampler::LcgSampler;
pub use scale::{QuantMode, ScaleTable};
pub use stats::{RmseAccumulator, SchemeStats};
