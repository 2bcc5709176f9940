//! Document storage shared by the repositories.
//!
//! `MemoryStore` keeps the three collections in process. It validates each
//! document on write and owns the unique indexes, so callers learn about
//! duplicates from the write itself.

mod memory;

pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("duplicate key for unique index {index}")]
    Conflict { index: &'static str },
    #[error("record not found")]
    NotFound,
    #[error("document failed validation: {0}")]
    Invalid(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
