use job_board::directory::UserId;
use job_board::newsletter::{Notification, Notifier, NotifyError};
use job_board::uploads::{ResumeRef, ResumeStore, ResumeUpload, UploadError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Digest channel that writes each message to the log instead of a mail
/// transport.
pub(crate) struct TracingNotifier {
    mail_from: String,
}

impl TracingNotifier {
    pub(crate) fn new(mail_from: impl Into<String>) -> Self {
        Self {
            mail_from: mail_from.into(),
        }
    }
}

impl Notifier for TracingNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if !notification.recipient_email.contains('@') {
            return Err(NotifyError::Rejected(format!(
                "invalid recipient {}",
                notification.recipient_email
            )));
        }
        info!(
            from = %self.mail_from,
            to = %notification.recipient_email,
            subject = %notification.subject,
            "digest email dispatched"
        );
        Ok(())
    }
}

/// Resume bytes kept in process, keyed by public id.
#[derive(Default, Clone)]
pub(crate) struct InMemoryResumeStore {
    files: Arc<Mutex<HashMap<String, ResumeUpload>>>,
}

#[cfg(test)]
impl InMemoryResumeStore {
    pub(crate) fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }
}

impl ResumeStore for InMemoryResumeStore {
    fn upload(&self, owner: &UserId, file: &ResumeUpload) -> Result<ResumeRef, UploadError> {
        let public_id = format!("resumes/{owner}/{}", uuid::Uuid::new_v4());
        let mut files = self
            .files
            .lock()
            .map_err(|_| UploadError::Unavailable("resume store lock poisoned".to_string()))?;
        files.insert(public_id.clone(), file.clone());
        Ok(ResumeRef {
            url: format!("memory://{public_id}/{}", file.file_name),
            public_id,
        })
    }

    fn remove(&self, public_id: &str) -> Result<(), UploadError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| UploadError::Unavailable("resume store lock poisoned".to_string()))?;
        files
            .remove(public_id)
            .map(|_| ())
            .ok_or_else(|| UploadError::Rejected(format!("unknown resume {public_id}")))
    }
}
