//! User-visible notifications (the toasts of the browser client).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

/// Queue of notifications waiting to be shown.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification {
            level,
            message: message.into(),
            raised_at: Utc::now(),
        };
        tracing::debug!(
            "[Notification] {}: {}",
            notification.level,
            notification.message
        );
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message);
    }

    /// Takes every pending notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(|e| e.into_inner()))
    }
}
