use std::sync::{Arc, Mutex};

use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use serde_json::Value;

use crate::applications::{ApplicantForm, ApplicationService};
use crate::board_router;
use crate::catalog::{CatalogService, Job, JobId, JobRepository, JobType};
use crate::directory::{DirectoryService, Niche, NicheSet, Role, User, UserId, UserRepository};
use crate::session::SessionKeys;
use crate::state::BoardState;
use crate::store::MemoryStore;
use crate::uploads::{ResumeRef, ResumeStore, ResumeUpload, UploadError, UploadPolicy};

pub(super) const BOUNDARY: &str = "board-test-boundary";

#[derive(Default)]
pub(super) struct MemoryResumes {
    pub(super) stored: Mutex<Vec<ResumeRef>>,
    pub(super) removed: Mutex<Vec<String>>,
}

impl MemoryResumes {
    pub(super) fn stored(&self) -> Vec<ResumeRef> {
        self.stored.lock().expect("resume mutex poisoned").clone()
    }

    pub(super) fn removed(&self) -> Vec<String> {
        self.removed.lock().expect("resume mutex poisoned").clone()
    }
}

impl ResumeStore for MemoryResumes {
    fn upload(&self, owner: &UserId, file: &ResumeUpload) -> Result<ResumeRef, UploadError> {
        let mut stored = self.stored.lock().expect("resume mutex poisoned");
        let public_id = format!("resumes/{owner}/{}", stored.len());
        let reference = ResumeRef {
            url: format!("memory://{public_id}/{}", file.file_name),
            public_id,
        };
        stored.push(reference.clone());
        Ok(reference)
    }

    fn remove(&self, public_id: &str) -> Result<(), UploadError> {
        self.removed
            .lock()
            .expect("resume mutex poisoned")
            .push(public_id.to_string());
        Ok(())
    }
}

pub(super) struct OfflineResumes;

impl ResumeStore for OfflineResumes {
    fn upload(&self, _owner: &UserId, _file: &ResumeUpload) -> Result<ResumeRef, UploadError> {
        Err(UploadError::Unavailable("media host offline".to_string()))
    }

    fn remove(&self, _public_id: &str) -> Result<(), UploadError> {
        Err(UploadError::Unavailable("media host offline".to_string()))
    }
}

pub(super) fn account(name: &str, email: &str, role: Role) -> User {
    let niches = match role {
        Role::JobSeeker => NicheSet::from_slots([
            Some("Data Science"),
            Some("Web Development"),
            Some("DevOps"),
        ])
        .expect("three niches"),
        Role::Employer => NicheSet::default(),
    };
    User {
        id: UserId::new(),
        name: name.to_string(),
        email: email.to_string(),
        phone: "5550100".to_string(),
        address: "Lagos".to_string(),
        role,
        niches,
        cover_letter: None,
        resume: None,
        password_hash: "$argon2id$stub".to_string(),
        created_at: Utc::now(),
    }
}

pub(super) fn posting(employer: &User) -> Job {
    Job {
        id: JobId::new(),
        title: "Platform Engineer".to_string(),
        job_type: JobType::FullTime,
        location: "Lagos".to_string(),
        company_name: "Paystack".to_string(),
        introduction: "Payments infrastructure".to_string(),
        responsibilities: "Run the clusters".to_string(),
        qualifications: "Kubernetes".to_string(),
        offers: None,
        salary: "90000".to_string(),
        hiring_multiple_candidates: true,
        personal_website: None,
        job_niche: Niche::new("DevOps").expect("niche"),
        posted_by: employer.id,
        job_posted_on: Utc::now(),
        notification_sent: false,
    }
}

pub(super) fn applicant() -> ApplicantForm {
    ApplicantForm {
        name: "Ngozi".to_string(),
        email: "ngozi@example.com".to_string(),
        phone: "5550123".to_string(),
        address: "Lagos".to_string(),
        cover_letter: "I have run Kubernetes in production.".to_string(),
    }
}

pub(super) fn pdf_resume() -> ResumeUpload {
    ResumeUpload {
        file_name: "cv.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.7 resume".to_vec(),
    }
}

/// Store seeded with one employer, one seeker, and one posting.
pub(super) struct Fixture {
    pub(super) store: Arc<MemoryStore>,
    pub(super) resumes: Arc<MemoryResumes>,
    pub(super) employer: User,
    pub(super) seeker: User,
    pub(super) job: Job,
}

impl Fixture {
    pub(super) fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let employer = account("Tunde", "tunde@paystack.test", Role::Employer);
        let seeker = account("Ngozi", "ngozi@example.com", Role::JobSeeker);
        UserRepository::insert(store.as_ref(), employer.clone()).expect("employer");
        UserRepository::insert(store.as_ref(), seeker.clone()).expect("seeker");
        let job = JobRepository::insert(store.as_ref(), posting(&employer)).expect("job");
        Self {
            store,
            resumes: Arc::new(MemoryResumes::default()),
            employer,
            seeker,
            job,
        }
    }

    pub(super) fn service(&self) -> ApplicationService {
        self.service_with(self.resumes.clone())
    }

    pub(super) fn service_with(&self, resumes: Arc<dyn ResumeStore>) -> ApplicationService {
        ApplicationService::new(
            self.store.clone(),
            self.store.clone(),
            resumes,
            UploadPolicy::default(),
        )
    }

    pub(super) fn sessions(&self) -> Arc<SessionKeys> {
        Arc::new(SessionKeys::new("applications-test-secret", 3600))
    }

    pub(super) fn router(&self) -> (Router, Arc<SessionKeys>) {
        let sessions = self.sessions();
        let state = BoardState {
            directory: Arc::new(DirectoryService::new(
                self.store.clone(),
                self.resumes.clone(),
                sessions.clone(),
                UploadPolicy::default(),
            )),
            catalog: Arc::new(CatalogService::new(self.store.clone())),
            applications: Arc::new(self.service()),
            sessions: sessions.clone(),
        };
        (board_router(state), sessions)
    }
}

pub(super) fn bearer(sessions: &SessionKeys, user: &User) -> String {
    let token = sessions.issue(user.id, user.role).expect("token issued");
    format!("Bearer {token}")
}

pub(super) fn multipart_body(fields: &[(&str, &str)], resume: Option<&ResumeUpload>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = resume {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn apply_request(
    job_id: &JobId,
    authorization: &str,
    fields: &[(&str, &str)],
    resume: Option<&ResumeUpload>,
) -> Request<axum::body::Body> {
    Request::post(format!("/api/v1/applications/{job_id}"))
        .header(header::AUTHORIZATION, authorization)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(multipart_body(fields, resume)))
        .expect("request builds")
}

pub(super) const APPLY_FIELDS: [(&str, &str); 5] = [
    ("name", "Ngozi"),
    ("email", "ngozi@example.com"),
    ("phone", "5550123"),
    ("address", "Lagos"),
    ("coverLetter", "I have run Kubernetes in production."),
];

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
