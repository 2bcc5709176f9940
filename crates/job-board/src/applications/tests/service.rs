use std::sync::Arc;

use super::common::*;
use crate::applications::{ApplicationId, ApplicationRepository, DeleteOutcome};
use crate::catalog::JobId;
use crate::directory::Role;
use crate::error::BoardError;

#[test]
fn submit_snapshots_the_applicant_and_posting() {
    let fixture = Fixture::new();
    let service = fixture.service();

    let submitted = service
        .submit(&fixture.job.id, &fixture.seeker, applicant(), Some(pdf_resume()))
        .expect("application accepted");

    assert_eq!(submitted.message, "Application submitted with resume");
    let application = &submitted.application;
    assert_eq!(application.job_seeker_info.id, fixture.seeker.id);
    assert_eq!(application.job_seeker_info.role, Role::JobSeeker);
    assert_eq!(application.employer_info.id, fixture.employer.id);
    assert_eq!(application.job_info.job_title, "Platform Engineer");
    assert!(application.job_seeker_info.resume.is_some());
    assert_eq!(fixture.resumes.stored().len(), 1);
}

#[test]
fn submit_without_resume_says_so() {
    let fixture = Fixture::new();
    let submitted = fixture
        .service()
        .submit(&fixture.job.id, &fixture.seeker, applicant(), None)
        .expect("application accepted");
    assert_eq!(
        submitted.message,
        "Application submitted without resume (recommended to add one)"
    );
    assert!(submitted.application.job_seeker_info.resume.is_none());
}

#[test]
fn employers_cannot_apply() {
    let fixture = Fixture::new();
    let err = fixture
        .service()
        .submit(&fixture.job.id, &fixture.employer, applicant(), None)
        .expect_err("employer rejected");
    assert_eq!(
        err,
        BoardError::forbidden("Employer not allowed to access this resource")
    );
}

#[test]
fn unknown_job_creates_nothing() {
    let fixture = Fixture::new();
    let err = fixture
        .service()
        .submit(&JobId::new(), &fixture.seeker, applicant(), Some(pdf_resume()))
        .expect_err("missing job");
    assert_eq!(err, BoardError::not_found("Job not found"));
    assert_eq!(fixture.store.application_count(), 0);
    assert!(fixture.resumes.stored().is_empty());
}

#[test]
fn second_application_to_the_same_job_conflicts_and_discards_its_upload() {
    let fixture = Fixture::new();
    let service = fixture.service();
    service
        .submit(&fixture.job.id, &fixture.seeker, applicant(), None)
        .expect("first application");

    let err = service
        .submit(&fixture.job.id, &fixture.seeker, applicant(), Some(pdf_resume()))
        .expect_err("duplicate");

    assert_eq!(
        err,
        BoardError::Conflict("You have already applied for this job".to_string())
    );
    assert_eq!(fixture.store.application_count(), 1);
    let stored = fixture.resumes.stored();
    assert_eq!(fixture.resumes.removed(), vec![stored[0].public_id.clone()]);
}

#[test]
fn rejected_file_types_never_reach_the_media_store() {
    let fixture = Fixture::new();
    let mut resume = pdf_resume();
    resume.content_type = "image/png".to_string();

    let err = fixture
        .service()
        .submit(&fixture.job.id, &fixture.seeker, applicant(), Some(resume))
        .expect_err("png rejected");

    assert!(matches!(err, BoardError::Validation(_)));
    assert!(fixture.resumes.stored().is_empty());
}

#[test]
fn unknown_job_wins_over_a_rejected_file() {
    let fixture = Fixture::new();
    let mut resume = pdf_resume();
    resume.content_type = "image/png".to_string();

    let err = fixture
        .service()
        .submit(&JobId::new(), &fixture.seeker, applicant(), Some(resume))
        .expect_err("missing job");

    assert_eq!(err, BoardError::not_found("Job not found"));
    assert!(fixture.resumes.stored().is_empty());
}

#[test]
fn media_store_outage_is_an_upstream_failure() {
    let fixture = Fixture::new();
    let service = fixture.service_with(Arc::new(OfflineResumes));
    let err = service
        .submit(&fixture.job.id, &fixture.seeker, applicant(), Some(pdf_resume()))
        .expect_err("upload failed");
    assert!(matches!(err, BoardError::Upstream(_)));
    assert_eq!(fixture.store.application_count(), 0);
}

#[test]
fn listings_are_scoped_to_the_caller_role() {
    let fixture = Fixture::new();
    let service = fixture.service();
    service
        .submit(&fixture.job.id, &fixture.seeker, applicant(), None)
        .expect("applied");

    assert_eq!(service.for_employer(&fixture.employer).expect("list").len(), 1);
    assert_eq!(service.for_seeker(&fixture.seeker).expect("list").len(), 1);
    assert!(matches!(
        service.for_employer(&fixture.seeker),
        Err(BoardError::Forbidden(_))
    ));
    assert!(matches!(
        service.for_seeker(&fixture.employer),
        Err(BoardError::Forbidden(_))
    ));
}

#[test]
fn both_sides_deleting_removes_the_record() {
    let fixture = Fixture::new();
    let service = fixture.service();
    let id = service
        .submit(&fixture.job.id, &fixture.seeker, applicant(), Some(pdf_resume()))
        .expect("applied")
        .application
        .id;

    assert_eq!(
        service.delete(&id, &fixture.seeker).expect("seeker delete"),
        DeleteOutcome::Hidden
    );
    assert!(service.for_seeker(&fixture.seeker).expect("list").is_empty());
    assert_eq!(service.for_employer(&fixture.employer).expect("list").len(), 1);

    assert_eq!(
        service
            .delete(&id, &fixture.employer)
            .expect("employer delete"),
        DeleteOutcome::Removed
    );
    assert!(service.for_employer(&fixture.employer).expect("list").is_empty());
    assert_eq!(
        ApplicationRepository::fetch(fixture.store.as_ref(), &id).expect("fetch"),
        None
    );
    assert_eq!(fixture.resumes.removed().len(), 1);
}

#[test]
fn repeated_delete_by_one_side_keeps_the_record() {
    let fixture = Fixture::new();
    let service = fixture.service();
    let id = service
        .submit(&fixture.job.id, &fixture.seeker, applicant(), None)
        .expect("applied")
        .application
        .id;

    service.delete(&id, &fixture.employer).expect("first");
    assert_eq!(
        service.delete(&id, &fixture.employer).expect("second"),
        DeleteOutcome::Hidden
    );
    assert_eq!(fixture.store.application_count(), 1);
}

#[test]
fn strangers_and_unknown_ids_cannot_delete() {
    let fixture = Fixture::new();
    let service = fixture.service();
    let id = service
        .submit(&fixture.job.id, &fixture.seeker, applicant(), None)
        .expect("applied")
        .application
        .id;

    let stranger = account("Femi", "femi@example.com", Role::JobSeeker);
    assert!(matches!(
        service.delete(&id, &stranger),
        Err(BoardError::Forbidden(_))
    ));
    assert_eq!(
        service.delete(&ApplicationId::new(), &fixture.seeker),
        Err(BoardError::not_found("Application not found"))
    );
}
