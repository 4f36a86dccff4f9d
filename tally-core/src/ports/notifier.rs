//! Notifier port - user-facing alerts

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Failure,
}

/// A blocking alert shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn failure(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Presents notifications to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
