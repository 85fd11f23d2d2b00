//! Cooperative cancellation
//!
//! A [`CancelSignal`] is a cloneable stop flag that workers poll between
//! logical steps (between chunks, for the IO engine). Nothing is preempted:
//! an in-flight read or write always runs to completion before the flag is
//! observed.
//!
//! A signal may carry a deadline, in which case it reports cancelled once the
//! deadline passes, and may be derived from a parent with [`CancelSignal::child`].
//! Cancelling a child never cancels its parent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Inner {
    flag: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<CancelSignal>,
}

/// Cloneable cooperative cancellation flag
#[derive(Debug, Clone)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

impl CancelSignal {
    /// Create a signal that is only cancelled explicitly
    pub fn new() -> Self {
        Self::build(None, None)
    }

    /// Create a signal that cancels itself once `timeout` has elapsed
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Instant::now().checked_add(timeout), None)
    }

    /// Derive a signal that is cancelled whenever `self` is, but can also be
    /// cancelled on its own
    pub fn child(&self) -> Self {
        Self::build(None, Some(self.clone()))
    }

    fn build(deadline: Option<Instant>, parent: Option<CancelSignal>) -> Self {
        Self {
            inner: Arc::new(Inner {
                flag: AtomicBool::new(false),
                deadline,
                parent,
            }),
        }
    }

    /// Request cancellation
    #[inline]
    pub fn cancel(&self) {
        self.inner.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested, the deadline passed, or the
    /// parent was cancelled
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        if self.inner.flag.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(deadline) = self.inner.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        self.inner
            .parent
            .as_ref()
            .is_some_and(|parent| parent.is_cancelled())
    }

    /// Deadline of this signal, if any (parents not included)
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_signal_not_cancelled() {
        let signal = CancelSignal::new();
        assert!(!signal.is_cancelled());
        assert!(signal.deadline().is_none());
    }

    #[test]
    fn test_cancel_visible_through_clones() {
        let signal = CancelSignal::new();
        let clone = signal.clone();
        clone.cancel();
        assert!(signal.is_cancelled());
    }

    #[test]
    fn test_cancel_visible_across_threads() {
        let signal = CancelSignal::new();
        let remote = signal.clone();
        thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(signal.is_cancelled());
    }

    #[test]
    fn test_timeout_expires() {
        let signal = CancelSignal::with_timeout(Duration::from_millis(5));
        thread::sleep(Duration::from_millis(20));
        assert!(signal.is_cancelled());
    }

    #[test]
    fn test_zero_timeout_is_immediately_cancelled() {
        assert!(CancelSignal::with_timeout(Duration::ZERO).is_cancelled());
    }

    #[test]
    fn test_child_follows_parent() {
        let parent = CancelSignal::new();
        let child = parent.child();
        assert!(!child.is_cancelled());
        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_child_cancel_does_not_reach_parent() {
        let parent = CancelSignal::new();
        let child = parent.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }
}
