//! Job postings: employer publishing, public search, and the digest flag.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Job, JobFilter, JobId, JobInput, JobType, PersonalWebsite};
pub use repository::JobRepository;
pub use router::catalog_routes;
pub use service::CatalogService;
