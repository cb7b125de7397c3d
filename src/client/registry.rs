//! Client-wide registry of outstanding exchanges.
//!
//! Every exchange registers an [`AbortController`] of its own while it is in
//! flight. [`HandleRegistry::abort_outstanding`] trips them, which is how
//! `HttpClient::abort()` reaches requests that were issued without a signal.
//!
//! | Mode | Tracked | `abort_outstanding()` cancels |
//! |------|---------|-------------------------------|
//! | `track_all` | every outstanding exchange | all of them |
//! | most recent | the latest exchange only | that exchange, if still outstanding |

use crate::abort::{AbortController, AbortSignal};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct HandleRegistry {
    track_all: bool,
    next_id: AtomicU64,
    handles: Mutex<Vec<(u64, AbortController)>>,
}

impl HandleRegistry {
    pub(crate) fn new(track_all: bool) -> Self {
        HandleRegistry {
            track_all,
            next_id: AtomicU64::new(0),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Register a new exchange and hand back the signal it must watch.
    pub(crate) fn register(self: &Arc<Self>) -> (AbortSignal, Registration) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let controller = AbortController::new();
        let signal = controller.signal();

        let mut handles = self.handles.lock();
        if !self.track_all {
            handles.clear();
        }
        handles.push((id, controller));

        let registration = Registration {
            registry: Arc::clone(self),
            id,
        };
        (signal, registration)
    }

    /// Trip every tracked exchange. Returns how many were tripped.
    pub(crate) fn abort_outstanding(&self) -> usize {
        let handles = std::mem::take(&mut *self.handles.lock());
        handles
            .into_iter()
            .filter(|(_, controller)| controller.abort())
            .count()
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.handles.lock().len()
    }

    fn release(&self, id: u64) {
        self.handles.lock().retain(|(hid, _)| *hid != id);
    }
}

/// Removes an exchange from the registry when dropped.
#[derive(Debug)]
pub(crate) struct Registration {
    registry: Arc<HandleRegistry>,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_all_aborts_every_handle() {
        let registry = Arc::new(HandleRegistry::new(true));
        let (a, _ra) = registry.register();
        let (b, _rb) = registry.register();
        assert_eq!(registry.outstanding(), 2);

        assert_eq!(registry.abort_outstanding(), 2);
        assert!(a.is_aborted());
        assert!(b.is_aborted());
        assert_eq!(registry.outstanding(), 0);
    }

    #[test]
    fn test_most_recent_only() {
        let registry = Arc::new(HandleRegistry::new(false));
        let (first, _r1) = registry.register();
        let (second, _r2) = registry.register();
        assert_eq!(registry.outstanding(), 1);

        assert_eq!(registry.abort_outstanding(), 1);
        assert!(!first.is_aborted());
        assert!(second.is_aborted());
    }

    #[test]
    fn test_registration_released_on_drop() {
        let registry = Arc::new(HandleRegistry::new(true));
        {
            let (_signal, _registration) = registry.register();
            assert_eq!(registry.outstanding(), 1);
        }
        assert_eq!(registry.outstanding(), 0);
        assert_eq!(registry.abort_outstanding(), 0);
    }

    #[test]
    fn test_settled_most_recent_is_not_resurrected() {
        let registry = Arc::new(HandleRegistry::new(false));
        let (first, r1) = registry.register();
        let (_second, r2) = registry.register();
        drop(r2);
        drop(r1);
        assert_eq!(registry.abort_outstanding(), 0);
        assert!(!first.is_aborted());
    }
}
