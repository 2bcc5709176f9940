use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BoardError;
use crate::uploads::ResumeRef;

pub const MAX_NICHES: usize = 3;

/// Identifier wrapper for registered accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The two kinds of account. Every role-dependent rule is a method here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Job Seeker")]
    JobSeeker,
    #[serde(rename = "Employer")]
    Employer,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::JobSeeker => "Job Seeker",
            Role::Employer => "Employer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "job seeker" | "jobseeker" | "seeker" => Some(Role::JobSeeker),
            "employer" => Some(Role::Employer),
            _ => None,
        }
    }

    /// Seekers are matched against postings, so they must name all three niches.
    pub const fn requires_niches(self) -> bool {
        matches!(self, Role::JobSeeker)
    }

    pub const fn can_post_jobs(self) -> bool {
        matches!(self, Role::Employer)
    }

    pub const fn can_apply(self) -> bool {
        matches!(self, Role::JobSeeker)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category tag shared by postings and user preferences. Compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Niche(String);

impl Niche {
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Niche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Up to three niche preferences. Slot order is kept for display only;
/// matching treats the preferences as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NicheSet(Vec<Niche>);

impl NicheSet {
    /// Builds the set from the first/second/third form slots, dropping blanks.
    pub fn from_slots<I, S>(slots: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let niches: Vec<Niche> = slots
            .into_iter()
            .flatten()
            .filter_map(|raw| Niche::new(raw))
            .collect();
        if niches.len() > MAX_NICHES {
            return Err(BoardError::validation(format!(
                "At most {MAX_NICHES} niches may be selected"
            )));
        }
        Ok(Self(niches))
    }

    pub fn contains(&self, niche: &Niche) -> bool {
        self.0.iter().any(|candidate| candidate == niche)
    }

    pub fn is_complete(&self) -> bool {
        self.0.len() == MAX_NICHES
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Niche> {
        self.0.iter()
    }
}

/// Account document. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
    pub niches: NicheSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumeRef>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_interested_in(&self, niche: &Niche) -> bool {
        self.niches.contains(niche)
    }
}

/// Registration payload as posted by the sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub first_niche: Option<String>,
    pub second_niche: Option<String>,
    pub third_niche: Option<String>,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub role: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile edits. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub cover_letter: Option<String>,
    pub first_niche: Option<String>,
    pub second_niche: Option<String>,
    pub third_niche: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}
