//! Job applications: submission with a unique (job, seeker) pair, per-party
//! listings, and two-sided soft delete.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantForm, Application, ApplicationId, DeletedBy, EmployerRef, JobSnapshot,
    SeekerSnapshot, SubmittedApplication,
};
pub use repository::ApplicationRepository;
pub use router::application_routes;
pub use service::{ApplicationService, DeleteOutcome};
