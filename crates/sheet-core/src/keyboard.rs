#![forbid(unsafe_code)]

//! On-screen keyboard signals with scoped listener lifetimes.
//!
//! A [`KeyboardSource`] delivers [`KeyboardEvent`]s to registered listeners
//! through channels. [`KeyboardSubscription`] owns one listener per signal
//! (`DidShow`, `DidHide`) for the lifetime of a component and removes them
//! when dropped, on every exit path.
//!
//! [`KeyboardHub`] is an in-process source. Platform glue forwards native
//! keyboard notifications into it; tests drive it directly.
//!
//! # Invariants
//!
//! 1. A subscription holds at most one listener per signal.
//! 2. Releasing a subscription is idempotent; dropping after an explicit
//!    `unsubscribe()` does nothing.
//! 3. A partially acquired subscription (second listener failed) releases
//!    the first listener before the error is returned.
//!
//! # Failure Modes
//!
//! - A listener whose receiver was dropped is pruned on the next emit.
//! - A poisoned hub lock is recovered; listener bookkeeping is plain data and
//!   stays consistent.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::event::{KeyboardEvent, KeyboardSignal};
use crate::logging::TARGET_INPUT;

/// Identity of one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Errors from a keyboard source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardError {
    /// The source has shut down and accepts no listeners.
    Closed,
    /// The platform refused the registration.
    Rejected(String),
}

impl fmt::Display for KeyboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "keyboard source is closed"),
            Self::Rejected(reason) => write!(f, "keyboard listener rejected: {reason}"),
        }
    }
}

impl std::error::Error for KeyboardError {}

/// A source of keyboard show/hide events.
pub trait KeyboardSource: Send + Sync {
    /// Register `sink` to receive events for `signal`.
    fn add_listener(
        &self,
        signal: KeyboardSignal,
        sink: Sender<KeyboardEvent>,
    ) -> Result<ListenerId, KeyboardError>;

    /// Remove a listener. Returns `false` if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

// ---------------------------------------------------------------------------
// KeyboardHub
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Listener {
    id: ListenerId,
    signal: KeyboardSignal,
    sink: Sender<KeyboardEvent>,
}

#[derive(Debug, Default)]
struct HubInner {
    listeners: Vec<Listener>,
    closed: bool,
}

/// In-process keyboard source.
#[derive(Debug, Default)]
pub struct KeyboardHub {
    inner: Mutex<HubInner>,
    next_id: AtomicU64,
}

impl KeyboardHub {
    /// Create an open hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared hub.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Deliver a keyboard-shown event with `height`.
    ///
    /// Returns the number of listeners that received it.
    pub fn emit_shown(&self, height: f64) -> usize {
        self.emit(KeyboardEvent::Shown { height })
    }

    /// Deliver a keyboard-hidden event.
    pub fn emit_hidden(&self) -> usize {
        self.emit(KeyboardEvent::Hidden)
    }

    /// Deliver `event` to every listener registered for its signal.
    pub fn emit(&self, event: KeyboardEvent) -> usize {
        let signal = event.signal();
        let mut inner = self.lock();
        let mut delivered = 0;
        inner.listeners.retain(|l| {
            if l.signal != signal {
                return true;
            }
            match l.sink.send(event) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    tracing::debug!(target: TARGET_INPUT, listener = l.id.0, "pruned disconnected keyboard listener");
                    false
                }
            }
        });
        delivered
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Stop accepting listeners and drop the registered ones.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.listeners.clear();
    }

    /// Whether [`close`](Self::close) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl KeyboardSource for KeyboardHub {
    fn add_listener(
        &self,
        signal: KeyboardSignal,
        sink: Sender<KeyboardEvent>,
    ) -> Result<ListenerId, KeyboardError> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(KeyboardError::Closed);
        }
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        inner.listeners.push(Listener { id, signal, sink });
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|l| l.id != id);
        inner.listeners.len() != before
    }
}

// ---------------------------------------------------------------------------
// KeyboardSubscription
// ---------------------------------------------------------------------------

/// Scoped ownership of the `DidShow` and `DidHide` listeners.
pub struct KeyboardSubscription {
    source: Arc<dyn KeyboardSource>,
    show: Option<ListenerId>,
    hide: Option<ListenerId>,
    events: Receiver<KeyboardEvent>,
}

impl fmt::Debug for KeyboardSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardSubscription")
            .field("show", &self.show)
            .field("hide", &self.hide)
            .finish_non_exhaustive()
    }
}

impl KeyboardSubscription {
    /// Register both listeners on `source`.
    pub fn subscribe(source: Arc<dyn KeyboardSource>) -> Result<Self, KeyboardError> {
        let (tx, rx) = mpsc::channel();
        let show = source.add_listener(KeyboardSignal::DidShow, tx.clone())?;
        let hide = match source.add_listener(KeyboardSignal::DidHide, tx) {
            Ok(id) => id,
            Err(err) => {
                source.remove_listener(show);
                return Err(err);
            }
        };
        tracing::debug!(target: TARGET_INPUT, show = show.0, hide = hide.0, "keyboard subscription acquired");
        Ok(Self {
            source,
            show: Some(show),
            hide: Some(hide),
            events: rx,
        })
    }

    /// Collect pending events without blocking, oldest first.
    pub fn drain(&self) -> Vec<KeyboardEvent> {
        self.events.try_iter().collect()
    }

    /// Whether any listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.show.is_some() || self.hide.is_some()
    }

    /// Remove the listeners now. Safe to call repeatedly.
    pub fn unsubscribe(&mut self) {
        let released = self.show.is_some() || self.hide.is_some();
        if let Some(id) = self.show.take() {
            self.source.remove_listener(id);
        }
        if let Some(id) = self.hide.take() {
            self.source.remove_listener(id);
        }
        if released {
            tracing::debug!(target: TARGET_INPUT, "keyboard subscription released");
        }
    }
}

impl Drop for KeyboardSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that accepts the first `accept` registrations, then rejects.
    struct FlakySource {
        hub: KeyboardHub,
        accept: AtomicU64,
    }

    impl KeyboardSource for FlakySource {
        fn add_listener(
            &self,
            signal: KeyboardSignal,
            sink: Sender<KeyboardEvent>,
        ) -> Result<ListenerId, KeyboardError> {
            if self.accept.load(Ordering::Relaxed) == 0 {
                return Err(KeyboardError::Rejected("quota".into()));
            }
            self.accept.fetch_sub(1, Ordering::Relaxed);
            self.hub.add_listener(signal, sink)
        }

        fn remove_listener(&self, id: ListenerId) -> bool {
            self.hub.remove_listener(id)
        }
    }

    #[test]
    fn subscription_registers_two_listeners() {
        let hub = KeyboardHub::shared();
        let sub = KeyboardSubscription::subscribe(hub.clone()).expect("subscribe");
        assert_eq!(hub.listener_count(), 2);
        assert!(sub.is_active());
    }

    #[test]
    fn events_arrive_in_order() {
        let hub = KeyboardHub::shared();
        let sub = KeyboardSubscription::subscribe(hub.clone()).expect("subscribe");
        assert_eq!(hub.emit_shown(250.0), 1);
        assert_eq!(hub.emit_hidden(), 1);
        assert_eq!(
            sub.drain(),
            vec![KeyboardEvent::Shown { height: 250.0 }, KeyboardEvent::Hidden]
        );
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn drop_releases_listeners() {
        let hub = KeyboardHub::shared();
        {
            let _sub = KeyboardSubscription::subscribe(hub.clone()).expect("subscribe");
            assert_eq!(hub.listener_count(), 2);
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let hub = KeyboardHub::shared();
        let mut sub = KeyboardSubscription::subscribe(hub.clone()).expect("subscribe");
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(hub.listener_count(), 0);
        drop(sub);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn repeated_cycles_do_not_leak() {
        let hub = KeyboardHub::shared();
        for _ in 0..50 {
            let sub = KeyboardSubscription::subscribe(hub.clone()).expect("subscribe");
            drop(sub);
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn partial_failure_releases_first_listener() {
        let source = Arc::new(FlakySource {
            hub: KeyboardHub::new(),
            accept: AtomicU64::new(1),
        });
        let err = KeyboardSubscription::subscribe(source.clone()).expect_err("second add fails");
        assert_eq!(err, KeyboardError::Rejected("quota".into()));
        assert_eq!(source.hub.listener_count(), 0);
    }

    #[test]
    fn closed_hub_rejects_subscription() {
        let hub = KeyboardHub::shared();
        hub.close();
        assert!(hub.is_closed());
        let err = KeyboardSubscription::subscribe(hub).expect_err("closed");
        assert_eq!(err, KeyboardError::Closed);
        assert_eq!(err.to_string(), "keyboard source is closed");
    }

    #[test]
    fn disconnected_listener_is_pruned() {
        let hub = KeyboardHub::new();
        let (tx, rx) = mpsc::channel();
        hub.add_listener(KeyboardSignal::DidShow, tx).expect("add");
        drop(rx);
        assert_eq!(hub.emit_shown(10.0), 0);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn hide_only_reaches_hide_listeners() {
        let hub = KeyboardHub::new();
        let (tx, rx) = mpsc::channel();
        hub.add_listener(KeyboardSignal::DidShow, tx).expect("add");
        assert_eq!(hub.emit_hidden(), 0);
        assert!(rx.try_recv().is_err());
    }
}
