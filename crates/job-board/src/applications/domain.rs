use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::JobId;
use crate::directory::{Role, UserId};
use crate::error::BoardError;
use crate::uploads::{ResumeRef, SubmittedForm};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub Uuid);

impl ApplicationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, BoardError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| BoardError::validation(format!("Invalid application id: {raw}")))
    }
}

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Applicant details copied at submission time. Later profile edits do not
/// rewrite past applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekerSnapshot {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub cover_letter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumeRef>,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerRef {
    pub id: UserId,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub job_title: String,
}

/// Per-party delete intent. The record is removed once both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedBy {
    pub job_seeker: bool,
    pub employer: bool,
}

impl DeletedBy {
    /// Record the caller's own side of the delete.
    pub fn mark(&mut self, role: Role) {
        match role {
            Role::JobSeeker => self.job_seeker = true,
            Role::Employer => self.employer = true,
        }
    }

    pub fn hidden_from(&self, role: Role) -> bool {
        match role {
            Role::JobSeeker => self.job_seeker,
            Role::Employer => self.employer,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.job_seeker && self.employer
    }
}

/// Application document linking a seeker, a posting, and its employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job_seeker_info: SeekerSnapshot,
    pub employer_info: EmployerRef,
    pub job_info: JobSnapshot,
    pub deleted_by: DeletedBy,
    pub created_at: DateTime<Utc>,
}

impl Application {
    /// Whether `caller` is the `role` side of this record.
    pub fn party_of(&self, caller: &UserId, role: Role) -> bool {
        match role {
            Role::JobSeeker => self.job_seeker_info.id == *caller,
            Role::Employer => self.employer_info.id == *caller,
        }
    }
}

/// Profile fields the applicant fills in on the apply form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub cover_letter: String,
}

impl ApplicantForm {
    pub fn from_form(form: &SubmittedForm) -> Result<Self, BoardError> {
        let missing = || BoardError::validation("All fields are required");
        Ok(Self {
            name: form.text("name").ok_or_else(missing)?,
            email: form.text("email").ok_or_else(missing)?,
            phone: form.text("phone").ok_or_else(missing)?,
            address: form.text("address").ok_or_else(missing)?,
            cover_letter: form.text("coverLetter").ok_or_else(missing)?,
        })
    }
}

/// Stored application plus the user-facing outcome message.
#[derive(Debug, Clone)]
pub struct SubmittedApplication {
    pub application: Application,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_role_marks_only_its_own_side() {
        let mut deleted = DeletedBy::default();
        deleted.mark(Role::JobSeeker);
        assert!(deleted.hidden_from(Role::JobSeeker));
        assert!(!deleted.hidden_from(Role::Employer));
        assert!(!deleted.is_complete());

        deleted.mark(Role::JobSeeker);
        assert!(!deleted.is_complete());

        deleted.mark(Role::Employer);
        assert!(deleted.is_complete());
    }

    #[test]
    fn applicant_form_requires_every_field() {
        let mut form = SubmittedForm::default();
        for (key, value) in [
            ("name", "Ravi"),
            ("email", "ravi@example.com"),
            ("phone", "5550101"),
            ("address", "Kochi"),
        ] {
            form.fields.insert(key.to_string(), value.to_string());
        }
        let err = ApplicantForm::from_form(&form).expect_err("cover letter missing");
        assert_eq!(err, BoardError::validation("All fields are required"));

        form.fields
            .insert("coverLetter".to_string(), "I love data".to_string());
        let applicant = ApplicantForm::from_form(&form).expect("complete form");
        assert_eq!(applicant.cover_letter, "I love data");
    }

    #[test]
    fn wire_shape_uses_camel_case_delete_flags() {
        let json = serde_json::to_value(DeletedBy {
            job_seeker: true,
            employer: false,
        })
        .expect("serializes");
        assert_eq!(json["jobSeeker"], true);
        assert_eq!(json["employer"], false);
    }
}
