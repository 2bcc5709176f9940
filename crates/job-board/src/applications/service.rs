use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Application, ApplicantForm, ApplicationId, DeletedBy, EmployerRef, JobSnapshot,
    SeekerSnapshot, SubmittedApplication,
};
use super::repository::ApplicationRepository;
use crate::catalog::{JobId, JobRepository};
use crate::directory::{Role, User};
use crate::error::BoardError;
use crate::store::RepositoryError;
use crate::uploads::{ResumeStore, ResumeUpload, UploadPolicy};

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The caller's side is hidden; the other party still sees the record.
    Hidden,
    /// Both parties have deleted; the record is gone.
    Removed,
}

/// Apply, list, and delete flows for applications.
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    resumes: Arc<dyn ResumeStore>,
    uploads: UploadPolicy,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        resumes: Arc<dyn ResumeStore>,
        uploads: UploadPolicy,
    ) -> Self {
        Self {
            applications,
            jobs,
            resumes,
            uploads,
        }
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.uploads
    }

    /// Record a seeker's application. The store's unique (job, seeker) index
    /// decides duplicates, so concurrent submissions cannot both succeed.
    pub fn submit(
        &self,
        job_id: &JobId,
        caller: &User,
        form: ApplicantForm,
        resume: Option<ResumeUpload>,
    ) -> Result<SubmittedApplication, BoardError> {
        if !caller.role.can_apply() {
            return Err(BoardError::forbidden(format!(
                "{} not allowed to access this resource",
                caller.role
            )));
        }
        let job = self
            .jobs
            .fetch(job_id)?
            .ok_or_else(|| BoardError::not_found("Job not found"))?;

        if let Some(file) = &resume {
            self.uploads.check(file)?;
        }

        let resume = match resume {
            Some(file) => Some(self.resumes.upload(&caller.id, &file)?),
            None => None,
        };

        let application = Application {
            id: ApplicationId::new(),
            job_seeker_info: SeekerSnapshot {
                id: caller.id,
                name: form.name,
                email: form.email,
                phone: form.phone,
                address: form.address,
                cover_letter: form.cover_letter,
                resume,
                role: Role::JobSeeker,
            },
            employer_info: EmployerRef {
                id: job.posted_by,
                role: Role::Employer,
            },
            job_info: JobSnapshot {
                job_id: job.id,
                job_title: job.title.clone(),
            },
            deleted_by: DeletedBy::default(),
            created_at: Utc::now(),
        };

        let application = match self.applications.insert(application.clone()) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict { .. }) => {
                self.discard_resume(&application);
                return Err(BoardError::Conflict(
                    "You have already applied for this job".to_string(),
                ));
            }
            Err(other) => {
                self.discard_resume(&application);
                return Err(other.into());
            }
        };

        info!(
            application_id = %application.id,
            job_id = %application.job_info.job_id,
            seeker = %application.job_seeker_info.id,
            "application submitted"
        );

        let message = if application.job_seeker_info.resume.is_some() {
            "Application submitted with resume"
        } else {
            "Application submitted without resume (recommended to add one)"
        };
        Ok(SubmittedApplication {
            application,
            message,
        })
    }

    pub fn for_employer(&self, caller: &User) -> Result<Vec<Application>, BoardError> {
        if caller.role != Role::Employer {
            return Err(BoardError::forbidden(format!(
                "{} not allowed to access this resource",
                caller.role
            )));
        }
        Ok(self.applications.for_employer(&caller.id)?)
    }

    pub fn for_seeker(&self, caller: &User) -> Result<Vec<Application>, BoardError> {
        if caller.role != Role::JobSeeker {
            return Err(BoardError::forbidden(format!(
                "{} not allowed to access this resource",
                caller.role
            )));
        }
        Ok(self.applications.for_seeker(&caller.id)?)
    }

    /// Hide the application from the caller's side; remove it once both
    /// parties have asked.
    pub fn delete(&self, id: &ApplicationId, caller: &User) -> Result<DeleteOutcome, BoardError> {
        let mut application = self
            .applications
            .fetch(id)?
            .ok_or_else(|| BoardError::not_found("Application not found"))?;

        if !application.party_of(&caller.id, caller.role) {
            return Err(BoardError::forbidden(
                "You are not authorized to delete this application",
            ));
        }

        application.deleted_by.mark(caller.role);
        if application.deleted_by.is_complete() {
            self.applications.remove(id)?;
            if let Some(resume) = &application.job_seeker_info.resume {
                if let Err(err) = self.resumes.remove(&resume.public_id) {
                    warn!(application_id = %id, error = %err, "failed to remove resume of deleted application");
                }
            }
            info!(application_id = %id, "application removed by both parties");
            Ok(DeleteOutcome::Removed)
        } else {
            self.applications.update(application)?;
            info!(application_id = %id, role = %caller.role, "application hidden");
            Ok(DeleteOutcome::Hidden)
        }
    }

    fn discard_resume(&self, application: &Application) {
        if let Some(resume) = &application.job_seeker_info.resume {
            if let Err(err) = self.resumes.remove(&resume.public_id) {
                warn!(public_id = %resume.public_id, error = %err, "failed to discard orphaned resume");
            }
        }
    }
}
