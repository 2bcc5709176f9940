//! Resume attachments: multipart form reading, the size/type policy, and the
//! storage collaborator that keeps the actual bytes.

use std::collections::HashMap;

use axum::extract::Multipart;
use serde::{Deserialize, Serialize};

use crate::directory::UserId;
use crate::error::BoardError;

pub const RESUME_FIELD: &str = "resume";

const MSWORD: &str = "application/msword";
const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Reference to an uploaded resume held by the media store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRef {
    pub public_id: String,
    pub url: String,
}

/// Raw resume file as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Size and type limits for resume files.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_bytes: usize,
}

impl UploadPolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn check(&self, upload: &ResumeUpload) -> Result<(), BoardError> {
        if upload.bytes.is_empty() {
            return Err(BoardError::validation(
                "Invalid resume file. Please try again.",
            ));
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(BoardError::validation(format!(
                "Resume file must be less than {}MB",
                self.max_bytes / (1024 * 1024)
            )));
        }
        if !is_allowed_type(&upload.content_type) {
            return Err(BoardError::validation(
                "Only PDF and Word documents are allowed",
            ));
        }
        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(5 * 1024 * 1024)
    }
}

fn is_allowed_type(content_type: &str) -> bool {
    let Ok(parsed) = content_type.parse::<mime::Mime>() else {
        return false;
    };
    let essence = parsed.essence_str();
    essence == mime::APPLICATION_PDF.essence_str() || essence == MSWORD || essence == DOCX
}

/// Media storage for resume files.
pub trait ResumeStore: Send + Sync {
    fn upload(&self, owner: &UserId, file: &ResumeUpload) -> Result<ResumeRef, UploadError>;
    fn remove(&self, public_id: &str) -> Result<(), UploadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("media store rejected the file: {0}")]
    Rejected(String),
    #[error("media store unavailable: {0}")]
    Unavailable(String),
}

impl From<UploadError> for BoardError {
    fn from(value: UploadError) -> Self {
        BoardError::Upstream(format!("Failed to upload resume: {value}"))
    }
}

/// Text fields plus the optional resume part of a submitted form.
#[derive(Debug, Default)]
pub struct SubmittedForm {
    pub fields: HashMap<String, String>,
    pub resume: Option<ResumeUpload>,
}

impl SubmittedForm {
    /// Trimmed, non-empty value of a text field.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub async fn read(mut multipart: Multipart) -> Result<Self, BoardError> {
        let mut form = SubmittedForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| BoardError::validation(format!("Invalid form data: {err}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == RESUME_FIELD && field.file_name().is_some() {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|err| {
                    BoardError::validation(format!("Invalid resume file: {err}"))
                })?;
                form.resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|err| BoardError::validation(format!("Invalid form data: {err}")))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }
}
