//! Alert lifecycle notifications.
//!
//! `AlertNotifier` is an explicitly-owned pub/sub object: the host constructs
//! one, hands it to the alert engine, and subscribes the UI to it. Two
//! surfaces are offered — a keyed callback registry for in-process listeners,
//! and a broadcast stream for reactive consumers. A panicking listener is
//! isolated so the remaining listeners still run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::models::Alert;

pub const ALERT_CREATED: &str = "alert:created";
pub const ALERT_UPDATED: &str = "alert:updated";
pub const ALERT_DELETED: &str = "alert:deleted";
pub const ALERTS_CHANGED: &str = "alerts:changed";

#[derive(Debug, Clone)]
pub enum AlertEvent {
    Created(Alert),
    Updated { id: String },
    Deleted { id: String },
    /// Catch-all fired after every mutation.
    Changed,
}

impl AlertEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created(_) => ALERT_CREATED,
            Self::Updated { .. } => ALERT_UPDATED,
            Self::Deleted { .. } => ALERT_DELETED,
            Self::Changed => ALERTS_CHANGED,
        }
    }
}

/// Handle returned by `add_listener`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&AlertEvent) + Send + Sync>;

pub struct AlertNotifier {
    listeners: Mutex<HashMap<&'static str, Vec<(ListenerId, Listener)>>>,
    next_id: AtomicU64,
    stream: broadcast::Sender<AlertEvent>,
}

const STREAM_CAPACITY: usize = 64;

impl AlertNotifier {
    pub fn new() -> Self {
        let (stream, _) = broadcast::channel(STREAM_CAPACITY);
        Self {
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            stream,
        }
    }

    /// Register a callback for one event name (`alert:created`, …).
    pub fn add_listener(
        &self,
        event: &'static str,
        callback: impl Fn(&AlertEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut listeners = self.listeners.lock().unwrap();
        listeners
            .entry(event)
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove one callback. Returns false if it was not registered.
    pub fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap();
        match listeners.get_mut(event) {
            Some(entries) => {
                let before = entries.len();
                entries.retain(|(entry_id, _)| *entry_id != id);
                entries.len() < before
            }
            None => false,
        }
    }

    pub fn remove_all_listeners(&self) {
        self.listeners.lock().unwrap().clear();
    }

    /// Subscribe to the full event stream (the channel the UI layer watches).
    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.stream.subscribe()
    }

    /// Deliver an event to every listener registered under its name, then
    /// publish it on the stream. Listener panics are contained per listener.
    pub fn emit(&self, event: AlertEvent) {
        let callbacks: Vec<Listener> = {
            let listeners = self.listeners.lock().unwrap();
            listeners
                .get(event.name())
                .map(|entries| entries.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };

        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
                tracing::error!(event = event.name(), "alert listener panicked");
            }
        }

        // No receivers is fine; the stream is optional for the host.
        let _ = self.stream.send(event);
    }
}

impl Default for AlertNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn listener_receives_matching_event() {
        let notifier = AlertNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        notifier.add_listener(ALERT_DELETED, move |event| {
            assert!(matches!(event, AlertEvent::Deleted { .. }));
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        notifier.emit(AlertEvent::Deleted { id: "x".into() });
        notifier.emit(AlertEvent::Changed); // different name, not delivered
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let notifier = AlertNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));

        notifier.add_listener(ALERTS_CHANGED, |_| panic!("listener bug"));
        let hits_clone = Arc::clone(&hits);
        notifier.add_listener(ALERTS_CHANGED, move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        notifier.emit(AlertEvent::Changed);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_listener_stops_receiving() {
        let notifier = AlertNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let id = notifier.add_listener(ALERTS_CHANGED, move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        notifier.emit(AlertEvent::Changed);
        assert!(notifier.remove_listener(ALERTS_CHANGED, id));
        assert!(!notifier.remove_listener(ALERTS_CHANGED, id));
        notifier.emit(AlertEvent::Changed);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_all_listeners_clears_registry() {
        let notifier = AlertNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        notifier.add_listener(ALERTS_CHANGED, move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        notifier.remove_all_listeners();
        notifier.emit(AlertEvent::Changed);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stream_carries_every_event() {
        let notifier = AlertNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.emit(AlertEvent::Deleted { id: "a".into() });
        notifier.emit(AlertEvent::Changed);

        assert!(matches!(rx.recv().await.unwrap(), AlertEvent::Deleted { .. }));
        assert!(matches!(rx.recv().await.unwrap(), AlertEvent::Changed));
    }
}
