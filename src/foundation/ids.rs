use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the short random identifiers used in artifact and temp file names.
///
/// Injected into the orchestrators so tests can pin filenames.
pub trait IdSource: Send + Sync {
    /// Return 8 lowercase hex characters.
    fn next_hex8(&self) -> String;
}

/// Production id source backed by v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_hex8(&self) -> String {
        let mut hex = uuid::Uuid::new_v4().simple().to_string();
        hex.truncate(8);
        hex
    }
}

/// Deterministic id source yielding `00000000`, `00000001`, ...
#[derive(Debug, Default)]
pub struct SequenceIdSource {
    next: AtomicU64,
}

impl SequenceIdSource {
    /// Start counting at `start`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdSource for SequenceIdSource {
    fn next_hex8(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{:08x}", n & 0xffff_ffff)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
