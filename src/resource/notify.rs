use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A non-blocking, user-visible notice (a toast in the browser)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Success,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Error,
            message: message.to_string(),
        });
    }
}

pub type SharedNotifier = Arc<dyn Notifier>;

/// Sends notices to the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(message = %notification.message, "notification"),
            NotificationLevel::Error => tracing::warn!(message = %notification.message, "notification"),
        }
    }
}

/// Keeps every notice in order; cheap to clone and share
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NotificationLevel::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(NotificationLevel::Success)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.notifications.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        LogNotifier.notify(notification.clone());
        self.lock().push(notification);
    }
}
