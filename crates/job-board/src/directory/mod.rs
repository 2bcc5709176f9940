//! Seeker and employer accounts with their niche preferences.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    LoginInput, Niche, NicheSet, PasswordChange, ProfileUpdate, RegistrationInput, Role, User,
    UserId, MAX_NICHES,
};
pub use repository::UserRepository;
pub use router::directory_routes;
pub use service::{DirectoryService, SessionGrant};
