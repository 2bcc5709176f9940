use std::sync::Mutex;

use serde::Serialize;

/// A composed digest message for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub recipient_email: String,
    pub recipient_name: String,
    pub subject: String,
    pub body: String,
}

/// Delivery channel for digest messages.
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("recipient rejected: {0}")]
    Rejected(String),
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

/// Keeps every delivered message in memory. Used by the demo command and
/// by tests that need to inspect what went out.
#[derive(Debug, Default)]
pub struct OutboxNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl OutboxNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .map_err(|_| NotifyError::Unavailable("outbox lock poisoned".to_string()))?
            .push(notification.clone());
        Ok(())
    }
}
