use super::{NotificationRequest, Notifier, PermissionState};
use crate::messaging::{EventKind, EventRouter, ServerEvent};
use crate::types::constants::{BRIDGE_BUFFER_SIZE, notification_defaults as copy};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Translates recognized inbound events into platform notifications.
///
/// The bridge is an ordinary router subscriber: a forwarding listener
/// feeds a bounded channel, and a consumer task awaits the permission
/// flow off the read task. Capability is probed once at construction;
/// permission is requested lazily at the first notification attempt.
pub struct NotificationBridge {
    notifier: Arc<dyn Notifier>,
    supported: bool,
}

impl NotificationBridge {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        let supported = notifier.is_supported();
        if !supported {
            tracing::debug!("Platform notifications unsupported, bridge will stay inert");
        }
        Self {
            notifier,
            supported,
        }
    }

    /// Register the bridge on a router and spawn its consumer task.
    ///
    /// The returned handle belongs in the client's task manager so the
    /// consumer dies with the rest of the background tasks.
    pub fn attach(self: &Arc<Self>, router: &EventRouter) -> JoinHandle<()> {
        let (tx, mut rx) = mpsc::channel::<ServerEvent>(BRIDGE_BUFFER_SIZE);

        for kind in [
            EventKind::ReminderNotification,
            EventKind::ReminderCreated,
            EventKind::ReminderUpdated,
            EventKind::SystemNotification,
        ] {
            let tx = tx.clone();
            router.on(
                kind,
                Arc::new(move |event| {
                    if tx.try_send(event.clone()).is_err() {
                        tracing::warn!("Notification queue full, dropping event");
                    }
                }),
            );
        }

        let bridge = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                bridge.handle_event(event).await;
            }
        })
    }

    /// Current permission state, prompting the user when undecided.
    pub async fn request_permission(&self) -> PermissionState {
        if !self.supported {
            return PermissionState::Unsupported;
        }
        match self.notifier.permission().await {
            PermissionState::Prompt => self.notifier.request_permission().await,
            state => state,
        }
    }

    pub(crate) async fn handle_event(&self, event: ServerEvent) {
        let Some(request) = build_request(&event) else {
            return;
        };

        if !self.supported {
            return;
        }

        match self.request_permission().await {
            PermissionState::Granted => {}
            state => {
                tracing::debug!("Notification permission {:?}, skipping '{}'", state, request.tag);
                return;
            }
        }

        if let Err(e) = self.notifier.show(request).await {
            tracing::warn!("Failed to show notification: {}", e);
        }
    }
}

/// The event-to-notification mapping table.
///
/// Returns `None` for events that do not notify (`reminder_updated`
/// without `completed`, every non-recognized kind).
pub fn build_request(event: &ServerEvent) -> Option<NotificationRequest> {
    match event {
        ServerEvent::ReminderNotification(reminder) => Some(NotificationRequest::new(
            copy::REMINDER_TITLE,
            reminder
                .text
                .as_deref()
                .or(reminder.message.as_deref())
                .unwrap_or(copy::REMINDER_BODY),
            format!("reminder-{}", reminder.id),
            copy::REMINDERS_URL,
        )),
        ServerEvent::ReminderCreated(reminder) => Some(NotificationRequest::new(
            copy::CREATED_TITLE,
            reminder.text.as_deref().unwrap_or(copy::CREATED_BODY),
            format!("created-{}", reminder.id),
            copy::REMINDERS_URL,
        )),
        ServerEvent::ReminderUpdated(reminder) if reminder.completed => {
            Some(NotificationRequest::new(
                copy::COMPLETED_TITLE,
                reminder.text.as_deref().unwrap_or(copy::COMPLETED_BODY),
                format!("completed-{}", reminder.id),
                copy::REMINDERS_URL,
            ))
        }
        ServerEvent::SystemNotification(system) => Some(NotificationRequest::new(
            system.title.as_deref().unwrap_or(copy::SYSTEM_TITLE),
            system
                .message
                .as_deref()
                .or(system.body.as_deref())
                .unwrap_or(copy::SYSTEM_BODY),
            format!("system-{}", chrono::Utc::now().timestamp_millis()),
            system.url.as_deref().unwrap_or(copy::ROOT_URL),
        )),
        _ => None,
    }
}
