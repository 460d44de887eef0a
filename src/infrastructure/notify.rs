use crate::domain::ports::{Notification, NotificationSink, Severity};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        let Notification { title, body, severity } = notification;
        match severity {
            Severity::Info => info!(title = %title, "{body}"),
            Severity::Warning => warn!(title = %title, "{body}"),
            Severity::Error => error!(title = %title, "{body}"),
        }
    }
}

/// Keeps every notification in memory. Clones share the same list.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotificationSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}
