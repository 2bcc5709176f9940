//! Niche digest: a periodic batch that e-mails seekers about new postings
//! in the niches they follow, then marks those postings as processed.

mod notifier;
mod overlap;
mod runner;
mod scheduler;
mod template;

pub use notifier::{Notification, Notifier, NotifyError, OutboxNotifier};
pub use overlap::{OverlapGuard, RunGuard};
pub use runner::{DigestReport, DigestRunner};
pub use scheduler::{DigestScheduler, SchedulerError};
pub use template::compose;
