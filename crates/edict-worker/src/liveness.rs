//! Read-only liveness flag shared with the status surface

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const NOT_STARTED: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

/// Whether the consumer loop is running
///
/// Clones share the same flag. Only the consumer changes it.
#[derive(Debug, Clone, Default)]
pub struct Liveness {
    state: Arc<AtomicU8>,
}

impl Liveness {
    /// Create a flag in the not-started state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the consumer loop is currently running
    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == RUNNING
    }

    /// Check if the consumer loop was ever started
    pub fn has_started(&self) -> bool {
        self.state.load(Ordering::Acquire) != NOT_STARTED
    }

    /// Mark the loop running until the returned guard is dropped
    ///
    /// The guard also clears the flag when the loop unwinds or its task is
    /// aborted.
    pub(crate) fn running(&self) -> RunningGuard<'_> {
        self.mark_running();
        RunningGuard { liveness: self }
    }

    pub(crate) fn mark_running(&self) {
        self.state.store(RUNNING, Ordering::Release);
    }

    pub(crate) fn mark_stopped(&self) {
        self.state.store(STOPPED, Ordering::Release);
    }
}

/// Marks the loop stopped on drop
pub(crate) struct RunningGuard<'a> {
    liveness: &'a Liveness,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.liveness.mark_stopped();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let liveness = Liveness::new();
        let observer = liveness.clone();
        assert!(!observer.is_running());
        assert!(!observer.has_started());

        liveness.mark_running();
        assert!(observer.is_running());
        assert!(observer.has_started());

        liveness.mark_stopped();
        assert!(!observer.is_running());
        assert!(observer.has_started());
    }

    #[test]
    fn test_guard_marks_stopped_on_unwind() {
        let liveness = Liveness::new();
        let observer = liveness.clone();

        let unwound = std::panic::catch_unwind(|| {
            let _running = liveness.running();
            assert!(observer.is_running());
            panic!("loop died");
        });

        assert!(unwound.is_err());
        assert!(!observer.is_running());
        assert!(observer.has_started());
    }
}
