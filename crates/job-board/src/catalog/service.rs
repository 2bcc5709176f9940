use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Job, JobFilter, JobId, JobInput, JobType, PersonalWebsite};
use super::repository::JobRepository;
use crate::directory::{Niche, User};
use crate::error::BoardError;

/// Posting lifecycle for employers and the public listing.
pub struct CatalogService {
    jobs: Arc<dyn JobRepository>,
}

impl CatalogService {
    pub fn new(jobs: Arc<dyn JobRepository>) -> Self {
        Self { jobs }
    }

    pub fn post(&self, caller: &User, input: JobInput) -> Result<Job, BoardError> {
        if !caller.role.can_post_jobs() {
            return Err(BoardError::forbidden(format!(
                "{} not allowed to access this resource",
                caller.role
            )));
        }

        let incomplete = || BoardError::validation("Please provide full job details");
        let title = required(&input.title).ok_or_else(incomplete)?;
        let job_type = required(&input.job_type).ok_or_else(incomplete)?;
        let location = required(&input.location).ok_or_else(incomplete)?;
        let company_name = required(&input.company_name).ok_or_else(incomplete)?;
        let introduction = required(&input.introduction).ok_or_else(incomplete)?;
        let responsibilities = required(&input.responsibilities).ok_or_else(incomplete)?;
        let qualifications = required(&input.qualifications).ok_or_else(incomplete)?;
        let salary = required(&input.salary).ok_or_else(incomplete)?;
        let job_niche = input
            .job_niche
            .as_deref()
            .and_then(Niche::new)
            .ok_or_else(incomplete)?;

        let job_type = JobType::parse(&job_type)
            .ok_or_else(|| BoardError::validation("Job type must be Full-time or Part-time"))?;

        let personal_website = match (
            required(&input.personal_website_title),
            required(&input.personal_website_url),
        ) {
            (Some(title), Some(url)) => Some(PersonalWebsite { title, url }),
            (None, None) => None,
            _ => {
                return Err(BoardError::validation(
                    "Provide both the website url and title",
                ))
            }
        };

        let hiring_multiple_candidates = input
            .hiring_multiple_candidates
            .as_deref()
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "yes" | "true"))
            .unwrap_or(false);

        let job = Job {
            id: JobId::new(),
            title,
            job_type,
            location,
            company_name,
            introduction,
            responsibilities,
            qualifications,
            offers: required(&input.offers),
            salary,
            hiring_multiple_candidates,
            personal_website,
            job_niche,
            posted_by: caller.id,
            job_posted_on: Utc::now(),
            notification_sent: false,
        };

        let job = self.jobs.insert(job)?;
        info!(job_id = %job.id, niche = %job.job_niche, employer = %job.posted_by, "job posted");
        Ok(job)
    }

    pub fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, BoardError> {
        Ok(self.jobs.list(filter)?)
    }

    pub fn get(&self, id: &JobId) -> Result<Job, BoardError> {
        self.jobs
            .fetch(id)?
            .ok_or_else(|| BoardError::not_found("Job not found"))
    }

    pub fn mine(&self, caller: &User) -> Result<Vec<Job>, BoardError> {
        if !caller.role.can_post_jobs() {
            return Err(BoardError::forbidden(format!(
                "{} not allowed to access this resource",
                caller.role
            )));
        }
        Ok(self.jobs.posted_by(&caller.id)?)
    }

    pub fn delete(&self, id: &JobId, caller: &User) -> Result<(), BoardError> {
        let job = self
            .jobs
            .fetch(id)?
            .ok_or_else(|| BoardError::not_found("Oops! Job not found"))?;
        if job.posted_by != caller.id {
            return Err(BoardError::forbidden(
                "You are not authorized to delete this job",
            ));
        }
        self.jobs.delete(id)?;
        info!(job_id = %id, "job deleted");
        Ok(())
    }
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
