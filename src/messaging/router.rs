use super::{EventKind, ServerEvent};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, RwLock};

/// A caller-supplied callback registered for one event kind
pub type Listener = Arc<dyn Fn(&ServerEvent) + Send + Sync + 'static>;

/// Routes decoded events to registered listeners.
///
/// Listeners for a kind run in registration order; duplicates are
/// allowed, and `off` removes the first registration whose `Arc`
/// identity matches. A panicking listener is logged and does not stop
/// its siblings.
pub struct EventRouter {
    listeners: RwLock<HashMap<EventKind, Vec<Listener>>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Register a listener for an event kind
    pub fn on(&self, kind: EventKind, listener: Listener) {
        let mut listeners = self.listeners.write().unwrap();
        listeners.entry(kind).or_default().push(listener);
    }

    /// Remove a previously registered listener; unknown listeners are a no-op
    pub fn off(&self, kind: &EventKind, listener: &Listener) {
        let mut listeners = self.listeners.write().unwrap();
        if let Some(registered) = listeners.get_mut(kind)
            && let Some(index) = registered.iter().position(|l| Arc::ptr_eq(l, listener))
        {
            registered.remove(index);
        }
    }

    /// Drop every registration (full manager teardown)
    pub fn clear(&self) {
        self.listeners.write().unwrap().clear();
    }

    /// Fan an event out to every listener registered under its kind.
    ///
    /// The listener list is cloned out of the lock first, so listeners
    /// are free to call `on`/`off` while a dispatch is in flight.
    pub fn dispatch(&self, event: &ServerEvent) {
        let kind = event.kind();
        let targets: Vec<Listener> = {
            let listeners = self.listeners.read().unwrap();
            listeners.get(&kind).cloned().unwrap_or_default()
        };

        if targets.is_empty() {
            if matches!(kind, EventKind::Custom(_)) {
                tracing::debug!("Unknown event type with no listeners: {}", kind);
            }
            return;
        }

        for listener in targets {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::error!("Listener for event '{}' panicked", kind);
            }
        }
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}
