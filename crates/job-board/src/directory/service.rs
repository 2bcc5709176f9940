use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    LoginInput, NicheSet, PasswordChange, ProfileUpdate, RegistrationInput, Role, User, UserId,
};
use super::repository::UserRepository;
use crate::error::BoardError;
use crate::session::{hash_password, verify_password, SessionKeys};
use crate::store::RepositoryError;
use crate::uploads::{ResumeStore, ResumeUpload, UploadPolicy};

/// Account plus a freshly signed session token.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub user: User,
    pub token: String,
}

/// Registration, login, and profile maintenance for both roles.
pub struct DirectoryService {
    users: Arc<dyn UserRepository>,
    resumes: Arc<dyn ResumeStore>,
    sessions: Arc<SessionKeys>,
    uploads: UploadPolicy,
}

impl DirectoryService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        resumes: Arc<dyn ResumeStore>,
        sessions: Arc<SessionKeys>,
        uploads: UploadPolicy,
    ) -> Self {
        Self {
            users,
            resumes,
            sessions,
            uploads,
        }
    }

    pub fn register(&self, input: RegistrationInput) -> Result<SessionGrant, BoardError> {
        let required = [
            ("name", &input.name),
            ("email", &input.email),
            ("phone", &input.phone),
            ("address", &input.address),
            ("password", &input.password),
            ("role", &input.role),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| non_blank(value).is_none())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(BoardError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let role = input
            .role
            .as_deref()
            .and_then(Role::parse)
            .ok_or_else(|| BoardError::validation("Invalid user role"))?;

        let niches = NicheSet::from_slots([
            input.first_niche.clone(),
            input.second_niche.clone(),
            input.third_niche.clone(),
        ])?;
        if role.requires_niches() && !niches.is_complete() {
            return Err(BoardError::validation(
                "Please provide your preferred job niches",
            ));
        }

        let password = input.password.as_deref().unwrap_or_default();
        let user = User {
            id: UserId::new(),
            name: non_blank(&input.name).unwrap_or_default(),
            email: normalize_email(input.email.as_deref().unwrap_or_default()),
            phone: non_blank(&input.phone).unwrap_or_default(),
            address: non_blank(&input.address).unwrap_or_default(),
            role,
            niches,
            cover_letter: non_blank(&input.cover_letter),
            resume: None,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        let user = self.users.insert(user).map_err(email_conflict)?;
        info!(user_id = %user.id, role = %user.role, "account registered");
        self.grant(user)
    }

    pub fn login(&self, input: LoginInput) -> Result<SessionGrant, BoardError> {
        let (Some(role), Some(email), Some(password)) = (
            non_blank(&input.role),
            non_blank(&input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(BoardError::validation(
                "Email, password and role are required",
            ));
        };
        let role = Role::parse(&role).ok_or_else(|| BoardError::validation("Invalid user role"))?;

        let invalid = || BoardError::Unauthorized("Invalid email or password".to_string());
        let user = self
            .users
            .find_by_email(&normalize_email(&email))?
            .ok_or_else(invalid)?;
        if !verify_password(&password, &user.password_hash) {
            return Err(invalid());
        }
        if user.role != role {
            return Err(BoardError::validation("Invalid user role"));
        }

        info!(user_id = %user.id, "login succeeded");
        self.grant(user)
    }

    pub fn find(&self, id: &UserId) -> Result<Option<User>, BoardError> {
        Ok(self.users.fetch(id)?)
    }

    pub fn update_profile(
        &self,
        caller: &User,
        update: ProfileUpdate,
        resume: Option<ResumeUpload>,
    ) -> Result<User, BoardError> {
        let mut user = self
            .users
            .fetch(&caller.id)?
            .ok_or_else(|| BoardError::not_found("User not found"))?;

        let slots = [
            update.first_niche,
            update.second_niche,
            update.third_niche,
        ];
        if slots.iter().any(Option::is_some) || user.role.requires_niches() {
            let niches = NicheSet::from_slots(slots)?;
            if user.role.requires_niches() && !niches.is_complete() {
                return Err(BoardError::validation(
                    "Please provide all preferred job niches",
                ));
            }
            user.niches = niches;
        }

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = normalize_email(&email);
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        if let Some(address) = update.address {
            user.address = address;
        }
        if let Some(cover_letter) = update.cover_letter {
            user.cover_letter = Some(cover_letter);
        }

        let (uploaded, replaced) = match resume {
            Some(file) => {
                self.uploads.check(&file)?;
                let uploaded = self.resumes.upload(&user.id, &file)?;
                let replaced = user.resume.replace(uploaded.clone());
                (Some(uploaded), replaced)
            }
            None => (None, None),
        };

        let user = match self.users.update(user) {
            Ok(user) => user,
            Err(err) => {
                if let Some(orphan) = uploaded {
                    if let Err(remove_err) = self.resumes.remove(&orphan.public_id) {
                        warn!(user_id = %caller.id, public_id = %orphan.public_id, error = %remove_err, "failed to discard orphaned resume");
                    }
                }
                return Err(email_conflict(err));
            }
        };
        if let Some(previous) = replaced {
            if let Err(err) = self.resumes.remove(&previous.public_id) {
                warn!(user_id = %user.id, public_id = %previous.public_id, error = %err, "failed to remove replaced resume");
            }
        }

        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    pub fn update_password(
        &self,
        caller: &User,
        change: PasswordChange,
    ) -> Result<SessionGrant, BoardError> {
        let mut user = self
            .users
            .fetch(&caller.id)?
            .ok_or_else(|| BoardError::not_found("User not found"))?;

        if !verify_password(&change.old_password, &user.password_hash) {
            return Err(BoardError::validation("Old password is incorrect"));
        }
        if change.new_password != change.confirm_password {
            return Err(BoardError::validation(
                "New password and confirm password do not match",
            ));
        }

        user.password_hash = hash_password(&change.new_password)?;
        let user = self.users.update(user)?;
        info!(user_id = %user.id, "password updated");
        self.grant(user)
    }

    fn grant(&self, user: User) -> Result<SessionGrant, BoardError> {
        let token = self.sessions.issue(user.id, user.role)?;
        Ok(SessionGrant { user, token })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

fn email_conflict(err: RepositoryError) -> BoardError {
    match err {
        RepositoryError::Conflict { .. } => {
            BoardError::Conflict("Email is already registered".to_string())
        }
        other => other.into(),
    }
}
