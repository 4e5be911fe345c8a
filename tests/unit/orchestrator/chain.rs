use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;

struct Scripted {
    id: &'static str,
    reply: fn() -> Result<Vec<u8>, BackendError>,
    calls: Arc<AtomicUsize>,
}

impl MediaBackend for Scripted {
    fn id(&self) -> &str {
        self.id
    }

    fn attempt(&self, _prompt: &str) -> Result<Vec<u8>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }
}

fn scripted(
    id: &'static str,
    reply: fn() -> Result<Vec<u8>, BackendError>,
) -> (Box<dyn MediaBackend>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    (
        Box::new(Scripted {
            id,
            reply,
            calls: calls.clone(),
        }),
        calls,
    )
}

#[test]
fn first_success_short_circuits() {
    let (a, a_calls) = scripted("a", || Err(BackendError::WarmingUp));
    let (b, b_calls) = scripted("b", || Ok(vec![1, 2, 3]));
    let (c, c_calls) = scripted("c", || Ok(vec![9]));
    let backends = vec![a, b, c];

    let won = run_chain(&backends, "p", Ok);
    assert_eq!(won, Some(("b".to_string(), vec![1, 2, 3])));
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn rejected_bytes_fall_through() {
    let (a, _) = scripted("a", || Ok(vec![0]));
    let (b, _) = scripted("b", || Ok(vec![0, 0, 0, 0]));
    let backends = vec![a, b];

    let won = run_chain(&backends, "p", |bytes| {
        if bytes.len() < 2 {
            Err(BackendError::TooSmall {
                size: bytes.len(),
                min: 2,
            })
        } else {
            Ok(bytes.len())
        }
    });
    assert_eq!(won, Some(("b".to_string(), 4)));
}

#[test]
fn exhausted_chain_returns_none() {
    let (a, a_calls) = scripted("a", || Err(BackendError::Timeout));
    let backends = vec![a];
    assert!(run_chain(&backends, "p", Ok).is_none());
    assert!(run_chain(&[], "p", Ok).is_none());
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn attempt_records_id_and_outcome() {
    let (a, _) = scripted("solo", || Err(BackendError::WarmingUp));
    let attempt = attempt_once(a.as_ref(), "p", &mut Ok);
    assert_eq!(attempt.backend_id, "solo");
    assert!(matches!(attempt.outcome, Err(BackendError::WarmingUp)));
}
