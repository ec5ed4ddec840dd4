//! # RoPE Quantization Error Simulator
//!
//! Chunked, cancelable simulation of how reduced-bit-width quantization
//! of rotary-position-embedding rotation angles degrades numerical
//! fidelity over a long position sequence. Two schemes are measured
//! against the exact rotation:
//!
//! - **log-domain** — quantize `ln(position * inv_freq)` and recover the
//!   angle through `exp`, spending the bit budget on relative precision;
//! - **naive linear** — quantize the raw angle directly (the baseline).
//!
//! The driver processes positions in fixed-size chunks and yields
//! between chunks, so a caller can interleave UI work or issue a newer
//! run. Supersession is newest-wins: a [`Session`] hands out runs with
//! increasing ids, and a run that discovers a newer id at a chunk
//! boundary discards itself without publishing. At most one
//! [`RunResult`] is ever published per issued configuration, and it is
//! always internally consistent — never a blend of two runs.
//!
//! ## Example
//!
//! ```rust
//! use ropeq_sim::{RunConfig, Session, StepState};
//!
//! let session = Session::new();
//! let mut run = session
//!     .issue(RunConfig {
//!         seq_len: 1024,
//!         dim: 32,
//!         bits: 4,
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let result = loop {
//!     match run.step() {
//!         StepState::Running { progress } => assert!(progress <= 100),
//!         StepState::Completed(result) => break result,
//!         StepState::Superseded => unreachable!(),
//!     }
//! };
//! assert_eq!(result.config.bits, 4);
//! assert!(result.stats_log.drift >= 0.0);
//! ```

pub mod config;
pub mod result;
pub mod run;
pub mod session;

pub use config::{ConfigError, RunConfig};
pub use result::{ChartPoint, HistBucket, RunResult, SchemeStats};
pub use run::{run_once, Run, StepState, DEFAULT_CHUNK_SIZE};
pub use session::Session;

// Re-exported so callers can name the mode without depending on
// ropeq-core directly.
pub use ropeq_core::scale::QuantMode;
