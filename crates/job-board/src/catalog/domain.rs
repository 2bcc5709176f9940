use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::{Niche, UserId};
use crate::error::BoardError;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, BoardError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| BoardError::validation(format!("Invalid job id: {raw}")))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
}

impl JobType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace([' ', '_'], "-").as_str() {
            "full-time" | "fulltime" => Some(JobType::FullTime),
            "part-time" | "parttime" => Some(JobType::PartTime),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalWebsite {
    pub title: String,
    pub url: String,
}

/// Job advertisement document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub job_type: JobType,
    pub location: String,
    pub company_name: String,
    pub introduction: String,
    pub responsibilities: String,
    pub qualifications: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offers: Option<String>,
    pub salary: String,
    pub hiring_multiple_candidates: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_website: Option<PersonalWebsite>,
    pub job_niche: Niche,
    pub posted_by: UserId,
    pub job_posted_on: DateTime<Utc>,
    /// Set once the niche digest has processed this posting.
    pub notification_sent: bool,
}

/// Posting form as submitted by an employer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    pub title: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub company_name: Option<String>,
    pub introduction: Option<String>,
    pub responsibilities: Option<String>,
    pub qualifications: Option<String>,
    pub offers: Option<String>,
    pub salary: Option<String>,
    #[serde(default)]
    pub hiring_multiple_candidates: Option<String>,
    pub personal_website_title: Option<String>,
    pub personal_website_url: Option<String>,
    pub job_niche: Option<String>,
}

/// Listing filters. Every filter is optional and they combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    pub city: Option<String>,
    pub niche: Option<String>,
    pub search_keyword: Option<String>,
    pub salary: Option<String>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(city) = active(&self.city) {
            if job.location != city {
                return false;
            }
        }
        if let Some(niche) = active(&self.niche) {
            if job.job_niche.as_str() != niche {
                return false;
            }
        }
        if let Some(salary) = active(&self.salary) {
            if job.salary != salary {
                return false;
            }
        }
        if let Some(keyword) = active(&self.search_keyword) {
            let needle = keyword.to_lowercase();
            let hit = [&job.title, &job.company_name, &job.introduction]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// A filter value counts only when it is non-blank and not the "All" option.
fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}
