use std::time::{Duration, Instant};

use crate::backend::{BackendError, MediaBackend};

/// Outcome of trying a single backend once.
#[derive(Debug)]
pub struct BackendAttempt<T> {
    /// [`MediaBackend::id`] of the backend tried.
    pub backend_id: String,
    /// Accepted value or the reason the stage failed.
    pub outcome: Result<T, BackendError>,
    /// Wall time spent on the attempt.
    pub duration: Duration,
}

/// Try `backend` once and run `accept` over the returned bytes.
pub fn attempt_once<T>(
    backend: &dyn MediaBackend,
    prompt: &str,
    accept: &mut impl FnMut(Vec<u8>) -> Result<T, BackendError>,
) -> BackendAttempt<T> {
    let started = Instant::now();
    let outcome = backend.attempt(prompt).and_then(|bytes| accept(bytes));
    BackendAttempt {
        backend_id: backend.id().to_string(),
        outcome,
        duration: started.elapsed(),
    }
}

/// Walk `backends` in order, each at most once, and return the first accepted value.
///
/// Failures are logged at `warn` and swallowed. `None` means the chain is exhausted.
pub fn run_chain<T>(
    backends: &[Box<dyn MediaBackend>],
    prompt: &str,
    mut accept: impl FnMut(Vec<u8>) -> Result<T, BackendError>,
) -> Option<(String, T)> {
    for backend in backends {
        let attempt = attempt_once(backend.as_ref(), prompt, &mut accept);
        let elapsed_ms = attempt.duration.as_millis() as u64;
        match attempt.outcome {
            Ok(value) => {
                tracing::info!(backend = %attempt.backend_id, elapsed_ms, "backend succeeded");
                return Some((attempt.backend_id, value));
            }
            Err(reason) => {
                tracing::warn!(
                    backend = %attempt.backend_id,
                    elapsed_ms,
                    reason = %reason,
                    "backend failed; falling back"
                );
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/orchestrator/chain.rs"]
mod tests;
