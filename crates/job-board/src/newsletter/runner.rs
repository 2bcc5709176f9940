use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use super::notifier::Notifier;
use super::template::compose;
use crate::catalog::{Job, JobRepository};
use crate::directory::UserRepository;
use crate::store::RepositoryError;

/// Counters for one digest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestReport {
    pub postings_scanned: usize,
    pub postings_marked: usize,
    pub notifications_sent: usize,
    pub delivery_failures: usize,
    pub posting_failures: usize,
}

impl fmt::Display for DigestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned {} postings, marked {}, sent {} notifications ({} delivery failures, {} posting failures)",
            self.postings_scanned,
            self.postings_marked,
            self.notifications_sent,
            self.delivery_failures,
            self.posting_failures
        )
    }
}

/// One pass of the niche digest over the catalog.
///
/// Delivery is at least once per (posting, recipient): the posting is only
/// marked after every recipient has been attempted, so a failed mark means
/// the next run sends the whole posting again.
pub struct DigestRunner {
    jobs: Arc<dyn JobRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl DigestRunner {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            jobs,
            users,
            notifier,
        }
    }

    /// Process every unsent posting in query order. Failures are logged and
    /// counted; the run itself never fails.
    pub fn run_once(&self) -> DigestReport {
        let mut report = DigestReport::default();

        let postings = match self.jobs.unsent() {
            Ok(postings) => postings,
            Err(err) => {
                error!(error = %err, "digest could not query unsent postings");
                return report;
            }
        };
        report.postings_scanned = postings.len();
        if postings.is_empty() {
            info!("digest found no unsent postings");
            return report;
        }
        info!(postings = postings.len(), "digest started");

        for job in &postings {
            match self.process(job, &mut report) {
                Ok(()) => report.postings_marked += 1,
                Err(err) => {
                    report.posting_failures += 1;
                    error!(job_id = %job.id, title = %job.title, error = %err, "digest failed for posting");
                }
            }
        }

        info!(
            marked = report.postings_marked,
            sent = report.notifications_sent,
            delivery_failures = report.delivery_failures,
            posting_failures = report.posting_failures,
            "digest finished"
        );
        report
    }

    fn process(&self, job: &Job, report: &mut DigestReport) -> Result<(), RepositoryError> {
        let recipients = self.users.interested_in(&job.job_niche)?;
        if recipients.is_empty() {
            info!(job_id = %job.id, niche = %job.job_niche, "no users follow this niche");
        }

        for user in &recipients {
            let notification = compose(job, user);
            match self.notifier.send(&notification) {
                Ok(()) => report.notifications_sent += 1,
                Err(err) => {
                    report.delivery_failures += 1;
                    warn!(job_id = %job.id, recipient = %user.email, error = %err, "digest delivery failed");
                }
            }
        }

        self.jobs.mark_notified(&job.id)?;
        info!(job_id = %job.id, recipients = recipients.len(), "posting marked as notified");
        Ok(())
    }
}
