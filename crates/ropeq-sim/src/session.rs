//! Run session — newest-wins run issuance
//!
//! A [`Session`] owns the monotonically increasing run-id counter that
//! enforces the engine's sole concurrency invariant: at most one run's
//! accumulators are ever published, and it is always the most recently
//! issued run's. Issuing a run bumps the shared counter; every
//! outstanding [`Run`](crate::run::Run) compares its own id against the
//! counter at each chunk boundary and silently discards itself when it
//! has been overtaken. No mutex is needed — each run owns its
//! accumulators outright, and the only shared state is the atomic
//! counter.
//!
//! ## Example
//!
//! ```rust
//! use ropeq_sim::{RunConfig, Session, StepState};
//!
//! let session = Session::new();
//! let mut first = session.issue(RunConfig { seq_len: 64, dim: 8, ..Default::default() }).unwrap();
//! let second = session.issue(RunConfig { seq_len: 64, dim: 16, ..Default::default() }).unwrap();
//!
//! // The first run was overtaken before doing any work.
//! assert!(matches!(first.step(), StepState::Superseded));
//!
//! // The second run completes normally.
//! let result = second.run_to_completion().unwrap();
//! assert_eq!(result.config.dim, 16);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::config::{ConfigError, RunConfig};
use crate::run::{Run, DEFAULT_CHUNK_SIZE};

/// Issues runs and supersedes outstanding ones, newest-wins.
#[derive(Debug)]
pub struct Session {
    /// Id of the most recently issued run; runs poll this between chunks.
    latest: Arc<AtomicU64>,
    chunk_size: usize,
}

impl Session {
    /// Create a session with the default chunk size.
    pub fn new() -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Positions processed per [`Run::step`] call. Smaller chunks bound
    /// cancellation latency tighter at the cost of per-chunk overhead.
    /// Clamped to at least 1.
    pub fn set_chunk_size(&mut self, chunk_size: usize) {
        self.chunk_size = chunk_size.max(1);
    }

    /// Validate `config` and issue a new run, superseding every
    /// outstanding one.
    pub fn issue(&self, config: RunConfig) -> Result<Run, ConfigError> {
        config.validate()?;
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            run_id = id,
            seq_len = config.seq_len,
            dim = config.dim,
            bits = config.bits,
            "issuing simulation run"
        );
        Ok(Run::new(
            id,
            Arc::clone(&self.latest),
            config,
            self.chunk_size,
        ))
    }

    /// Id of the most recently issued run (0 before the first).
    pub fn latest_run_id(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::StepState;

    fn small_config() -> RunConfig {
        RunConfig {
            seq_len: 300,
            dim: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_run_ids_increase() {
        let session = Session::new();
        assert_eq!(session.latest_run_id(), 0);
        let _a = session.issue(small_config()).unwrap();
        assert_eq!(session.latest_run_id(), 1);
        let _b = session.issue(small_config()).unwrap();
        assert_eq!(session.latest_run_id(), 2);
    }

    #[test]
    fn test_invalid_config_issues_nothing() {
        let session = Session::new();
        let bad = RunConfig {
            seq_len: 0,
            ..Default::default()
        };
        assert!(session.issue(bad).is_err());
        assert_eq!(session.latest_run_id(), 0);
    }

    #[test]
    fn test_newer_run_supersedes_in_flight_run() {
        let session = Session::new();
        let mut first = session.issue(small_config()).unwrap();
        // One chunk of progress, then get overtaken.
        assert!(matches!(first.step(), StepState::Running { .. }));
        let second = session
            .issue(RunConfig {
                seed: 7,
                ..small_config()
            })
            .unwrap();
        assert!(matches!(first.step(), StepState::Superseded));
        // Exactly one result is published, and it is the second run's.
        let result = second.run_to_completion().unwrap();
        assert_eq!(result.config.seed, 7);
        assert!(first.run_to_completion().is_none());
    }

    #[test]
    fn test_chunk_size_floor() {
        let mut session = Session::new();
        session.set_chunk_size(0);
        let mut run = session
            .issue(RunConfig {
                seq_len: 2,
                dim: 4,
                ..Default::default()
            })
            .unwrap();
        // Chunk size 1: two steps to finish.
        assert!(matches!(run.step(), StepState::Running { progress: 50 }));
        assert!(matches!(run.step(), StepState::Completed(_)));
    }
}
