use std::sync::{Mutex, MutexGuard};

use super::RepositoryError;
use crate::applications::{Application, ApplicationId, ApplicationRepository};
use crate::catalog::{Job, JobFilter, JobId, JobRepository};
use crate::directory::{Niche, Role, User, UserId, UserRepository};

const USERS_EMAIL_INDEX: &str = "users.email";
const APPLICATIONS_JOB_SEEKER_INDEX: &str = "applications.job_seeker";

/// In-process document store. Each collection sits behind its own mutex and
/// keeps insertion order, which is the order listings return.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    jobs: Mutex<Vec<Job>>,
    applications: Mutex<Vec<Application>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        lock(&self.users).map(|users| users.len()).unwrap_or(0)
    }

    pub fn application_count(&self) -> usize {
        lock(&self.applications)
            .map(|applications| applications.len())
            .unwrap_or(0)
    }
}

fn lock<T>(collection: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    collection
        .lock()
        .map_err(|_| RepositoryError::Unavailable("collection lock poisoned".to_string()))
}

fn require(value: &str, field: &str) -> Result<(), RepositoryError> {
    if value.trim().is_empty() {
        Err(RepositoryError::Invalid(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn require_email(value: &str) -> Result<(), RepositoryError> {
    let valid = value
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::Invalid(
            "Please provide a valid email".to_string(),
        ))
    }
}

fn validate_user(user: &User) -> Result<(), RepositoryError> {
    require(&user.name, "name")?;
    require_email(&user.email)?;
    require(&user.phone, "phone")?;
    require(&user.address, "address")?;
    require(&user.password_hash, "password")?;
    if user.role.requires_niches() && !user.niches.is_complete() {
        return Err(RepositoryError::Invalid(
            "job seekers need three niches".to_string(),
        ));
    }
    Ok(())
}

fn validate_job(job: &Job) -> Result<(), RepositoryError> {
    require(&job.title, "title")?;
    require(&job.location, "location")?;
    require(&job.company_name, "companyName")?;
    require(&job.introduction, "introduction")?;
    require(&job.responsibilities, "responsibilities")?;
    require(&job.qualifications, "qualifications")?;
    require(&job.salary, "salary")
}

fn validate_application(application: &Application) -> Result<(), RepositoryError> {
    let seeker = &application.job_seeker_info;
    require(&seeker.name, "jobSeekerInfo.name")?;
    require_email(&seeker.email)?;
    require(&seeker.phone, "jobSeekerInfo.phone")?;
    require(&seeker.address, "jobSeekerInfo.address")?;
    require(&seeker.cover_letter, "jobSeekerInfo.coverLetter")?;
    require(&application.job_info.job_title, "jobInfo.jobTitle")?;
    if seeker.role != Role::JobSeeker || application.employer_info.role != Role::Employer {
        return Err(RepositoryError::Invalid(
            "application parties have the wrong roles".to_string(),
        ));
    }
    Ok(())
}

impl UserRepository for MemoryStore {
    fn insert(&self, user: User) -> Result<User, RepositoryError> {
        validate_user(&user)?;
        let mut users = lock(&self.users)?;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict {
                index: USERS_EMAIL_INDEX,
            });
        }
        users.push(user.clone());
        Ok(user)
    }

    fn update(&self, user: User) -> Result<User, RepositoryError> {
        validate_user(&user)?;
        let mut users = lock(&self.users)?;
        if users
            .iter()
            .any(|existing| existing.id != user.id && existing.email == user.email)
        {
            return Err(RepositoryError::Conflict {
                index: USERS_EMAIL_INDEX,
            });
        }
        let slot = users
            .iter_mut()
            .find(|existing| existing.id == user.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    fn fetch(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let users = lock(&self.users)?;
        Ok(users.iter().find(|user| user.id == *id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = lock(&self.users)?;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    fn interested_in(&self, niche: &Niche) -> Result<Vec<User>, RepositoryError> {
        let users = lock(&self.users)?;
        Ok(users
            .iter()
            .filter(|user| user.is_interested_in(niche))
            .cloned()
            .collect())
    }
}

impl JobRepository for MemoryStore {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        validate_job(&job)?;
        lock(&self.jobs)?.push(job.clone());
        Ok(job)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let jobs = lock(&self.jobs)?;
        Ok(jobs.iter().find(|job| job.id == *id).cloned())
    }

    fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, RepositoryError> {
        let jobs = lock(&self.jobs)?;
        Ok(jobs.iter().filter(|job| filter.matches(job)).cloned().collect())
    }

    fn posted_by(&self, employer: &UserId) -> Result<Vec<Job>, RepositoryError> {
        let jobs = lock(&self.jobs)?;
        Ok(jobs
            .iter()
            .filter(|job| job.posted_by == *employer)
            .cloned()
            .collect())
    }

    fn delete(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut jobs = lock(&self.jobs)?;
        let before = jobs.len();
        jobs.retain(|job| job.id != *id);
        if jobs.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn unsent(&self) -> Result<Vec<Job>, RepositoryError> {
        let jobs = lock(&self.jobs)?;
        Ok(jobs
            .iter()
            .filter(|job| !job.notification_sent)
            .cloned()
            .collect())
    }

    fn mark_notified(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut jobs = lock(&self.jobs)?;
        let job = jobs
            .iter_mut()
            .find(|job| job.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        job.notification_sent = true;
        Ok(())
    }
}

impl ApplicationRepository for MemoryStore {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        validate_application(&application)?;
        let mut applications = lock(&self.applications)?;
        let duplicate = applications.iter().any(|existing| {
            existing.job_info.job_id == application.job_info.job_id
                && existing.job_seeker_info.id == application.job_seeker_info.id
        });
        if duplicate {
            return Err(RepositoryError::Conflict {
                index: APPLICATIONS_JOB_SEEKER_INDEX,
            });
        }
        applications.push(application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let applications = lock(&self.applications)?;
        Ok(applications
            .iter()
            .find(|application| application.id == *id)
            .cloned())
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        validate_application(&application)?;
        let mut applications = lock(&self.applications)?;
        let slot = applications
            .iter_mut()
            .find(|existing| existing.id == application.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = application;
        Ok(())
    }

    fn remove(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        let mut applications = lock(&self.applications)?;
        let before = applications.len();
        applications.retain(|application| application.id != *id);
        if applications.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn for_employer(&self, employer: &UserId) -> Result<Vec<Application>, RepositoryError> {
        let applications = lock(&self.applications)?;
        Ok(applications
            .iter()
            .filter(|application| {
                application.employer_info.id == *employer
                    && !application.deleted_by.hidden_from(Role::Employer)
            })
            .cloned()
            .collect())
    }

    fn for_seeker(&self, seeker: &UserId) -> Result<Vec<Application>, RepositoryError> {
        let applications = lock(&self.applications)?;
        Ok(applications
            .iter()
            .filter(|application| {
                application.job_seeker_info.id == *seeker
                    && !application.deleted_by.hidden_from(Role::JobSeeker)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::Utc;

    use super::*;
    use crate::applications::{DeletedBy, EmployerRef, JobSnapshot, SeekerSnapshot};
    use crate::catalog::JobType;
    use crate::directory::NicheSet;

    fn user(email: &str, role: Role, niches: [&str; 3]) -> User {
        User {
            id: UserId::new(),
            name: "Asha".to_string(),
            email: email.to_string(),
            phone: "5550100".to_string(),
            address: "Pune".to_string(),
            role,
            niches: NicheSet::from_slots(niches.map(Some)).expect("three niches"),
            cover_letter: None,
            resume: None,
            password_hash: "$argon2id$stub".to_string(),
            created_at: Utc::now(),
        }
    }

    fn job(niche: &str, posted_by: UserId) -> Job {
        Job {
            id: JobId::new(),
            title: "Data Analyst".to_string(),
            job_type: JobType::FullTime,
            location: "Pune".to_string(),
            company_name: "Acme".to_string(),
            introduction: "Join us".to_string(),
            responsibilities: "Analyse".to_string(),
            qualifications: "SQL".to_string(),
            offers: None,
            salary: "50000".to_string(),
            hiring_multiple_candidates: false,
            personal_website: None,
            job_niche: Niche::new(niche).expect("niche"),
            posted_by,
            job_posted_on: Utc::now(),
            notification_sent: false,
        }
    }

    fn application(job: &Job, seeker: UserId) -> Application {
        Application {
            id: ApplicationId::new(),
            job_seeker_info: SeekerSnapshot {
                id: seeker,
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                phone: "5550100".to_string(),
                address: "Pune".to_string(),
                cover_letter: "Hello".to_string(),
                resume: None,
                role: Role::JobSeeker,
            },
            employer_info: EmployerRef {
                id: job.posted_by,
                role: Role::Employer,
            },
            job_info: JobSnapshot {
                job_id: job.id,
                job_title: job.title.clone(),
            },
            deleted_by: DeletedBy::default(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn email_index_rejects_duplicates_on_insert_and_update() {
        let store = MemoryStore::new();
        let first = UserRepository::insert(
            &store,
            user("a@example.com", Role::JobSeeker, ["A", "B", "C"]),
        )
        .expect("first insert");
        let err = UserRepository::insert(
            &store,
            user("a@example.com", Role::Employer, ["A", "B", "C"]),
        )
        .expect_err("duplicate email");
        assert_eq!(err, RepositoryError::Conflict { index: "users.email" });

        let second = UserRepository::insert(
            &store,
            user("b@example.com", Role::JobSeeker, ["A", "B", "C"]),
        )
        .expect("second insert");
        let mut renamed = second.clone();
        renamed.email = first.email.clone();
        assert!(matches!(
            UserRepository::update(&store, renamed),
            Err(RepositoryError::Conflict { .. })
        ));
        assert_eq!(store.user_count(), 2);
    }

    #[test]
    fn invalid_documents_never_reach_the_collection() {
        let store = MemoryStore::new();
        let err = UserRepository::insert(
            &store,
            user("not-an-email", Role::Employer, ["A", "B", "C"]),
        )
        .expect_err("invalid email");
        assert!(matches!(err, RepositoryError::Invalid(_)));

        let mut posting = job("DevOps", UserId::new());
        posting.title = "  ".to_string();
        assert!(matches!(
            JobRepository::insert(&store, posting),
            Err(RepositoryError::Invalid(_))
        ));
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn unsent_and_mark_notified_track_the_flag() {
        let store = MemoryStore::new();
        let employer = UserId::new();
        let first = JobRepository::insert(&store, job("DevOps", employer)).expect("insert");
        let second = JobRepository::insert(&store, job("Blockchain", employer)).expect("insert");

        store.mark_notified(&first.id).expect("mark");
        let unsent = store.unsent().expect("unsent");
        assert_eq!(unsent.len(), 1);
        assert_eq!(unsent[0].id, second.id);

        assert_eq!(
            store.mark_notified(&JobId::new()),
            Err(RepositoryError::NotFound)
        );
    }

    #[test]
    fn interested_in_matches_any_slot() {
        let store = MemoryStore::new();
        UserRepository::insert(
            &store,
            user("a@example.com", Role::JobSeeker, ["Data Science", "Web Development", "DevOps"]),
        )
        .expect("insert");
        UserRepository::insert(
            &store,
            user("b@example.com", Role::JobSeeker, ["Cybersecurity", "Cloud Computing", "Blockchain"]),
        )
        .expect("insert");

        let devops = store
            .interested_in(&Niche::new("DevOps").expect("niche"))
            .expect("query");
        assert_eq!(devops.len(), 1);
        assert_eq!(devops[0].email, "a@example.com");
    }

    #[test]
    fn concurrent_applies_leave_exactly_one_record() {
        let store = Arc::new(MemoryStore::new());
        let posting = job("DevOps", UserId::new());
        JobRepository::insert(store.as_ref(), posting.clone()).expect("insert job");
        let seeker = UserId::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let record = application(&posting, seeker);
                thread::spawn(move || ApplicationRepository::insert(store.as_ref(), record))
            })
            .collect();

        let outcomes: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread finished"))
            .collect();
        let accepted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        assert_eq!(accepted, 1);
        assert!(outcomes.iter().all(|outcome| match outcome {
            Ok(_) => true,
            Err(err) => matches!(err, RepositoryError::Conflict { .. }),
        }));
        assert_eq!(store.application_count(), 1);
    }

    #[test]
    fn listings_hide_the_side_that_deleted() {
        let store = MemoryStore::new();
        let posting = job("DevOps", UserId::new());
        let seeker = UserId::new();
        let mut record =
            ApplicationRepository::insert(&store, application(&posting, seeker)).expect("insert");

        record.deleted_by.mark(Role::JobSeeker);
        ApplicationRepository::update(&store, record.clone()).expect("update");

        assert!(store.for_seeker(&seeker).expect("seeker list").is_empty());
        assert_eq!(
            store
                .for_employer(&posting.posted_by)
                .expect("employer list")
                .len(),
            1
        );
    }
}
