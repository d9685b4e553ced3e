use super::connection::ConnectionState;
use crate::infrastructure::{Backoff, TaskManager};
use tokio::sync::watch;

/// Consolidated mutable state for RealtimeClient
/// Using a single struct reduces lock contention
pub struct ClientState {
    /// Reconnect schedule; its attempt counter doubles as the
    /// `reconnect_attempts` reported in status snapshots
    pub backoff: Backoff,

    /// Whether the exhausted-retries event has already been emitted for
    /// the current outage
    pub ceiling_reported: bool,

    /// Whether the disconnect was manual (prevents auto-reconnect)
    pub was_manual_disconnect: bool,

    /// Background task manager
    pub task_manager: TaskManager,

    /// Sender for state change notifications
    pub state_change_tx: Option<watch::Sender<(ConnectionState, bool)>>,
}

impl ClientState {
    pub fn new() -> Self {
        Self {
            backoff: Backoff::default(),
            ceiling_reported: false,
            was_manual_disconnect: false,
            task_manager: TaskManager::new(),
            state_change_tx: None,
        }
    }

    /// Reset the reconnect bookkeeping (successful open, explicit connect)
    pub fn reset_reconnect(&mut self) {
        self.backoff.reset();
        self.ceiling_reported = false;
    }

    /// Notify state change watchers
    pub fn notify_state_change(&self, state: ConnectionState, manual: bool) {
        if let Some(tx) = &self.state_change_tx
            && tx.send((state, manual)).is_err()
        {
            tracing::debug!(
                "State change watcher disconnected, could not notify state: {:?}",
                state
            );
        }
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}
