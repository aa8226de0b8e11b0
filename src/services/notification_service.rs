use parking_lot::Mutex;
use serde::Serialize;

// ==============================================================================
// Notifications
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, message: message.into() }
    }
}

/// Where user-visible messages go.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

// ==============================================================================
// Sinks
// ==============================================================================

/// Writes notifications to the log. Used by the command-line driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::error!("{}", notification.message),
            NotificationLevel::Info => tracing::info!("{}", notification.message),
            NotificationLevel::Success => tracing::info!("✓ {}", notification.message),
        }
    }
}

/// Keeps notifications until a presenter drains them.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        self.pending.lock().push(notification);
    }
}
