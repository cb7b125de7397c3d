//! Cancellation tokens.
//!
//! An [`AbortController`] owns one [`AbortSignal`] and is the only thing that
//! can trip it. Signals are cheap to clone and may be shared by any number of
//! exchanges; each exchange registers a listener while it is in flight.
//!
//! # States
//!
//! ```text
//! armed (aborted = false) ──abort()──▶ tripped (aborted = true)
//! ```
//!
//! The transition happens once. Listeners are notified synchronously, in
//! registration order, by the `abort()` call that trips the signal. Later
//! `abort()` calls do nothing.
//!
//! # Examples
//!
//! ```
//! use courier_http::{AbortController, AbortSignal};
//! use std::sync::{Arc, Mutex};
//!
//! let controller = AbortController::new();
//! let signal: AbortSignal = controller.signal();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let log = seen.clone();
//! signal.add_listener(move || log.lock().unwrap().push("first"));
//! let log = seen.clone();
//! signal.add_listener(move || log.lock().unwrap().push("second"));
//!
//! controller.abort();
//! controller.abort();
//!
//! assert!(signal.is_aborted());
//! assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
//! ```

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

type Listener = Box<dyn FnOnce() + Send>;

/// Identifies a registered listener so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct SignalState {
    aborted: bool,
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

/// Observable cancellation flag.
///
/// Clones share the same underlying state.
#[derive(Clone, Default)]
pub struct AbortSignal {
    state: Arc<Mutex<SignalState>>,
}

impl AbortSignal {
    /// Whether the signal has been tripped. Never resets.
    pub fn is_aborted(&self) -> bool {
        self.state.lock().aborted
    }

    /// Register a listener that runs once when the signal trips.
    ///
    /// Listeners added after the signal tripped are never called; check
    /// [`is_aborted`](Self::is_aborted) after registering.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.state.lock();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        if !state.aborted {
            state.listeners.push((id, Box::new(listener)));
        }
        id
    }

    /// Remove a listener. Returns `false` if it already ran or was removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.state.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(lid, _)| *lid != id);
        state.listeners.len() != before
    }

    /// Number of listeners waiting for the signal.
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    fn trip(&self) -> bool {
        let listeners = {
            let mut state = self.state.lock();
            if state.aborted {
                return false;
            }
            state.aborted = true;
            std::mem::take(&mut state.listeners)
        };

        // Run outside the lock so listeners may touch the signal.
        for (_, listener) in listeners {
            listener();
        }
        true
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AbortSignal")
            .field("aborted", &state.aborted)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Sole owner permitted to trip an [`AbortSignal`].
#[derive(Debug, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    /// Create a controller with a fresh, armed signal.
    pub fn new() -> Self {
        AbortController::default()
    }

    /// A handle to the controlled signal.
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Trip the signal and notify its listeners.
    ///
    /// Returns `true` for the call that tripped the signal, `false` for any
    /// later call.
    pub fn abort(&self) -> bool {
        self.signal.trip()
    }
}

/// Removes a listener from its signal when dropped.
pub(crate) struct ListenerGuard {
    signal: AbortSignal,
    id: ListenerId,
}

impl ListenerGuard {
    pub(crate) fn attach<F>(signal: &AbortSignal, listener: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let id = signal.add_listener(listener);
        ListenerGuard {
            signal: signal.clone(),
            id,
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.signal.remove_listener(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_signal_starts_armed() {
        let controller = AbortController::new();
        assert!(!controller.signal().is_aborted());
    }

    #[test]
    fn test_abort_is_monotonic() {
        let controller = AbortController::new();
        let signal = controller.signal();
        assert!(controller.abort());
        assert!(!controller.abort());
        assert!(signal.is_aborted());
        assert!(signal.is_aborted());
    }

    #[test]
    fn test_listeners_fire_once_in_order() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let order = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));

        for i in 0..3 {
            let order = order.clone();
            let calls = calls.clone();
            signal.add_listener(move || {
                order.lock().push(i);
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        controller.abort();
        controller.abort();

        assert_eq!(*order.lock(), vec![0, 1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_removed_listener_not_called() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        let id = signal.add_listener(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert!(signal.remove_listener(id));
        assert!(!signal.remove_listener(id));

        controller.abort();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_after_trip_is_dropped() {
        let controller = AbortController::new();
        let signal = controller.signal();
        controller.abort();

        signal.add_listener(|| panic!("must not run"));
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_inspect_signal() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let observed = Arc::new(Mutex::new(None));

        let inner = signal.clone();
        let slot = observed.clone();
        signal.add_listener(move || *slot.lock() = Some(inner.is_aborted()));

        controller.abort();
        assert_eq!(*observed.lock(), Some(true));
    }

    #[test]
    fn test_guard_deregisters_on_drop() {
        let controller = AbortController::new();
        let signal = controller.signal();
        {
            let _a = ListenerGuard::attach(&signal, || {});
            let _b = ListenerGuard::attach(&signal, || {});
            assert_eq!(signal.listener_count(), 2);
        }
        assert_eq!(signal.listener_count(), 0);
    }
}
