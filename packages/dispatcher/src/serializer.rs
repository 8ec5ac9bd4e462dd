//! Process-wide gate that lets one claim sequence run at a time.

use std::time::Instant;

use tokio::sync::{Mutex, MutexGuard};

/// Mutual exclusion for the select-and-claim critical section.
///
/// Exclusivity holds within one process only. Two dispatchers sharing a
/// store can still hand out the same task.
#[derive(Debug, Default)]
pub struct ClaimSerializer {
    gate: Mutex<()>,
}

/// Proof of holding the claim gate. Released when dropped.
#[must_use = "the claim gate is released as soon as the permit is dropped"]
#[derive(Debug)]
pub struct ClaimPermit<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl ClaimSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the gate. Waiters are admitted in FIFO order.
    pub async fn acquire(&self) -> ClaimPermit<'_> {
        let started = Instant::now();
        let guard = self.gate.lock().await;
        tracing::trace!(waited_us = started.elapsed().as_micros() as u64, "claim gate acquired");
        ClaimPermit { _guard: guard }
    }

    /// Take the gate only if nobody holds it.
    pub fn try_acquire(&self) -> Option<ClaimPermit<'_>> {
        self.gate
            .try_lock()
            .ok()
            .map(|guard| ClaimPermit { _guard: guard })
    }

    /// Whether a claim is in flight right now.
    pub fn is_held(&self) -> bool {
        self.gate.try_lock().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn permit_releases_on_drop() {
        let serializer = ClaimSerializer::new();
        {
            let _permit = serializer.acquire().await;
            assert!(serializer.is_held());
            assert!(serializer.try_acquire().is_none());
        }
        assert!(!serializer.is_held());
        assert!(serializer.try_acquire().is_some());
    }
}
