use crate::types::Result;
use crate::types::constants::NOTIFICATION_AUTO_CLOSE_MS;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of a permission query or request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// Permission has not been decided yet; a request will prompt the user
    Prompt,
    /// The platform has no notification surface at all
    Unsupported,
}

/// Ephemeral description of one notification to show.
///
/// Built from an inbound event and handed to the platform backend; never
/// stored. The `tag` lets the platform collapse notifications referring
/// to the same logical item.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    pub tag: String,
    /// Where user activation (click) should navigate
    pub url: String,
    /// Dismiss automatically after this long without interaction
    pub auto_close: Duration,
}

impl NotificationRequest {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        tag: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: Some(crate::types::constants::notification_defaults::ICON.to_string()),
            tag: tag.into(),
            url: url.into(),
            auto_close: Duration::from_millis(NOTIFICATION_AUTO_CLOSE_MS),
        }
    }
}

/// Injected platform notification primitive.
///
/// The bridge owns the policy (which events notify, permission handling,
/// auto-close duration); implementations own the mechanism: displaying
/// title/body/icon/tag, honoring `auto_close`, and on user activation
/// bringing the application to the foreground, navigating to
/// `request.url` and dismissing the notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Capability probe; a `false` here makes the bridge inert
    fn is_supported(&self) -> bool;

    /// Current permission state without prompting
    async fn permission(&self) -> PermissionState;

    /// Prompt the user; resolves to the resulting state
    async fn request_permission(&self) -> PermissionState;

    /// Display one notification
    async fn show(&self, request: NotificationRequest) -> Result<()>;
}

/// Notifier for embedders without a native notification surface.
///
/// Reports `Unsupported` everywhere, which keeps the bridge inert
/// without erroring.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    fn is_supported(&self) -> bool {
        false
    }

    async fn permission(&self) -> PermissionState {
        PermissionState::Unsupported
    }

    async fn request_permission(&self) -> PermissionState {
        PermissionState::Unsupported
    }

    async fn show(&self, request: NotificationRequest) -> Result<()> {
        tracing::debug!("NullNotifier dropping notification '{}'", request.title);
        Ok(())
    }
}
