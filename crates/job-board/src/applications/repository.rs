use super::domain::{Application, ApplicationId};
use crate::directory::UserId;
use crate::store::RepositoryError;

/// Storage abstraction for applications.
///
/// Implementations must enforce a unique index on (job id, seeker id):
/// `insert` returns `RepositoryError::Conflict` when the pair already exists,
/// atomically with the write.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn remove(&self, id: &ApplicationId) -> Result<(), RepositoryError>;
    /// Applications to the employer's postings that the employer has not deleted.
    fn for_employer(&self, employer: &UserId) -> Result<Vec<Application>, RepositoryError>;
    /// The seeker's applications that the seeker has not deleted.
    fn for_seeker(&self, seeker: &UserId) -> Result<Vec<Application>, RepositoryError>;
}
