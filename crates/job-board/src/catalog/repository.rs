use super::domain::{Job, JobFilter, JobId};
use crate::directory::UserId;
use crate::store::RepositoryError;

/// Storage abstraction for postings. Listing order is storage order.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, RepositoryError>;
    fn posted_by(&self, employer: &UserId) -> Result<Vec<Job>, RepositoryError>;
    fn delete(&self, id: &JobId) -> Result<(), RepositoryError>;
    /// Postings the digest has not processed yet.
    fn unsent(&self) -> Result<Vec<Job>, RepositoryError>;
    /// Flip `notification_sent` to true. Fails with `NotFound` if the posting is gone.
    fn mark_notified(&self, id: &JobId) -> Result<(), RepositoryError>;
}
