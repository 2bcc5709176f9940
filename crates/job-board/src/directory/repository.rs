use super::domain::{Niche, User, UserId};
use crate::store::RepositoryError;

/// Storage abstraction for accounts. Email is a unique key.
pub trait UserRepository: Send + Sync {
    fn insert(&self, user: User) -> Result<User, RepositoryError>;
    fn update(&self, user: User) -> Result<User, RepositoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    /// Users whose niche preferences contain `niche`, in storage order.
    fn interested_in(&self, niche: &Niche) -> Result<Vec<User>, RepositoryError>;
}
