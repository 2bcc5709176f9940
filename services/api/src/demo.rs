use crate::infra::TracingNotifier;
use chrono::Utc;
use clap::Args;
use job_board::catalog::{Job, JobId, JobRepository, JobType};
use job_board::directory::{Niche, NicheSet, Role, User, UserId, UserRepository};
use job_board::error::AppError;
use job_board::newsletter::{DigestReport, DigestRunner, Notifier, OutboxNotifier};
use job_board::store::MemoryStore;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DigestArgs {
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Log each message through the tracing notifier instead of listing them
    #[arg(long)]
    pub(crate) log_only: bool,
}

pub(crate) fn run_digest_demo(args: DigestArgs) -> Result<(), AppError> {
    let store = Arc::new(MemoryStore::new());
    seed(&store);

    let outbox = Arc::new(OutboxNotifier::new());
    let notifier: Arc<dyn Notifier> = if args.log_only {
        Arc::new(TracingNotifier::new("digest@jobboard.local"))
    } else {
        outbox.clone()
    };
    let runner = DigestRunner::new(store.clone(), store.clone(), notifier);

    let report = runner.run_once();
    render_report(&report, args.json);

    if !args.log_only {
        println!("\nMessages");
        for notification in outbox.sent() {
            println!(
                "- to {} <{}>: {}",
                notification.recipient_name, notification.recipient_email, notification.subject
            );
        }
    }

    let again = runner.run_once();
    println!(
        "\nSecond run: {} postings scanned, {} notifications sent",
        again.postings_scanned, again.notifications_sent
    );
    Ok(())
}

fn render_report(report: &DigestReport, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Digest report unavailable: {err}"),
        }
    } else {
        println!("Niche digest demo");
        println!("- {report}");
    }
}

fn seed(store: &MemoryStore) {
    let employer = demo_user("Dana Employer", "dana@acme.test", Role::Employer, None);
    let seekers = [
        demo_user(
            "Priya",
            "priya@example.com",
            Role::JobSeeker,
            Some(["Data Science", "Web Development", "DevOps"]),
        ),
        demo_user(
            "Marco",
            "marco@example.com",
            Role::JobSeeker,
            Some(["Cybersecurity", "Cloud Computing", "Blockchain"]),
        ),
    ];

    for user in std::iter::once(employer.clone()).chain(seekers) {
        if let Err(err) = UserRepository::insert(store, user) {
            println!("  Seed user skipped: {err}");
        }
    }

    for (title, niche) in [
        ("Machine Learning Engineer", "Data Science"),
        ("Security Analyst", "Cybersecurity"),
        ("Technical Writer", "Documentation"),
    ] {
        let Some(job) = demo_job(title, niche, &employer) else {
            continue;
        };
        if let Err(err) = JobRepository::insert(store, job) {
            println!("  Seed posting skipped: {err}");
        }
    }
}

fn demo_user(name: &str, email: &str, role: Role, niches: Option<[&str; 3]>) -> User {
    User {
        id: UserId::new(),
        name: name.to_string(),
        email: email.to_string(),
        phone: "5550100".to_string(),
        address: "Remote".to_string(),
        role,
        niches: niches
            .and_then(|slots| NicheSet::from_slots(slots.map(Some)).ok())
            .unwrap_or_default(),
        cover_letter: None,
        resume: None,
        password_hash: "demo-account-without-login".to_string(),
        created_at: Utc::now(),
    }
}

fn demo_job(title: &str, niche: &str, employer: &User) -> Option<Job> {
    Some(Job {
        id: JobId::new(),
        title: title.to_string(),
        job_type: JobType::FullTime,
        location: "Remote".to_string(),
        company_name: "Acme Analytics".to_string(),
        introduction: format!("Acme is hiring a {title}."),
        responsibilities: "Own the roadmap for your area".to_string(),
        qualifications: "Three years of relevant experience".to_string(),
        offers: Some("Equity and a learning budget".to_string()),
        salary: "$120,000".to_string(),
        hiring_multiple_candidates: false,
        personal_website: None,
        job_niche: Niche::new(niche)?,
        posted_by: employer.id,
        job_posted_on: Utc::now(),
        notification_sent: false,
    })
}
