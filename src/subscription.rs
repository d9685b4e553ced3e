use crate::client::{ConnectionStatus, RealtimeClient};
use crate::messaging::{EventKind, Listener};
use crate::notifications::PermissionState;
use crate::types::constants::STATUS_POLL_INTERVAL_MS;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A UI consumer's handle onto the shared [`RealtimeClient`].
///
/// Many independent consumers can hold subscriptions against one client:
/// creating or dropping a subscription never opens a second connection
/// and never disturbs listeners registered by anyone else. Status is
/// refreshed by an interval poll rather than on every change, so
/// `status()` may be stale by up to the poll period.
pub struct RealtimeSubscription {
    client: Arc<RealtimeClient>,
    status_rx: watch::Receiver<ConnectionStatus>,
    registered: Mutex<Vec<(EventKind, Listener)>>,
    poll_task: JoinHandle<()>,
}

impl RealtimeSubscription {
    /// Subscribe with the default status refresh period
    pub fn new(client: Arc<RealtimeClient>) -> Self {
        Self::with_poll_interval(client, Duration::from_millis(STATUS_POLL_INTERVAL_MS))
    }

    /// Subscribe with a custom status refresh period
    pub fn with_poll_interval(client: Arc<RealtimeClient>, interval: Duration) -> Self {
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::default());

        let poll_client = Arc::clone(&client);
        let poll_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let status = poll_client.connection_status().await;
                if status_tx.send(status).is_err() {
                    break;
                }
            }
        });

        Self {
            client,
            status_rx,
            registered: Mutex::new(Vec::new()),
            poll_task,
        }
    }

    /// Last polled connection flag
    pub fn is_connected(&self) -> bool {
        self.status_rx.borrow().is_connected
    }

    /// Last polled status snapshot
    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// Register a listener on the shared client, tracked for removal on drop
    pub fn on(&self, kind: impl Into<EventKind>, listener: Listener) {
        let kind = kind.into();
        self.registered
            .lock()
            .unwrap()
            .push((kind.clone(), Arc::clone(&listener)));
        self.client.on(kind, listener);
    }

    /// Remove a listener registered through this subscription
    pub fn off(&self, kind: impl Into<EventKind>, listener: &Listener) {
        let kind = kind.into();
        let mut registered = self.registered.lock().unwrap();
        if let Some(index) = registered
            .iter()
            .position(|(k, l)| *k == kind && Arc::ptr_eq(l, listener))
        {
            registered.remove(index);
        }
        drop(registered);

        self.client.off(kind, listener);
    }

    /// Send passthrough (same drop-when-disconnected semantics)
    pub async fn send(&self, kind: impl Into<EventKind>, data: serde_json::Value) {
        self.client.send(kind, data).await;
    }

    /// Notification permission passthrough
    pub async fn request_notification_permission(&self) -> PermissionState {
        self.client.request_notification_permission().await
    }

    /// The shared client this subscription observes
    pub fn client(&self) -> &Arc<RealtimeClient> {
        &self.client
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        // Remove only this consumer's listeners; everyone else's stay
        let mut registered = self.registered.lock().unwrap();
        for (kind, listener) in registered.drain(..) {
            self.client.off(kind, &listener);
        }
        self.poll_task.abort();
    }
}
