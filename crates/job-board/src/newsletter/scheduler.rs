use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::overlap::OverlapGuard;
use super::runner::{DigestReport, DigestRunner};

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("digest scheduler is already running")]
    AlreadyRunning,
    #[error("digest scheduler is not running")]
    NotRunning,
    #[error("digest task ended abnormally: {0}")]
    Task(String),
}

struct Ticker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runs the digest on a fixed interval. Ticks that arrive while a run is in
/// flight are skipped.
pub struct DigestScheduler {
    runner: Arc<DigestRunner>,
    period: Duration,
    guard: OverlapGuard,
    ticker: Mutex<Option<Ticker>>,
}

impl DigestScheduler {
    pub fn new(runner: Arc<DigestRunner>, period: Duration) -> Self {
        Self {
            runner,
            period,
            guard: OverlapGuard::new(),
            ticker: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the tick loop. The first run happens one period after start.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        let mut slot = self.ticker.lock().await;
        if slot.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(tick_loop(
            Arc::clone(&self.runner),
            self.guard.clone(),
            self.period,
            token.clone(),
        ));
        *slot = Some(Ticker { token, handle });
        info!(interval_secs = self.period.as_secs(), "digest scheduler started");
        Ok(())
    }

    /// Cancel the tick loop and wait for it, including any run in flight.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        let ticker = self
            .ticker
            .lock()
            .await
            .take()
            .ok_or(SchedulerError::NotRunning)?;
        ticker.token.cancel();
        ticker
            .handle
            .await
            .map_err(|err| SchedulerError::Task(err.to_string()))?;
        info!("digest scheduler stopped");
        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        self.ticker.lock().await.is_some()
    }

    /// Run one digest now. Returns `None` when a run is already in progress.
    pub async fn trigger(&self) -> Option<DigestReport> {
        run_guarded(Arc::clone(&self.runner), &self.guard).await
    }
}

async fn tick_loop(
    runner: Arc<DigestRunner>,
    guard: OverlapGuard,
    period: Duration,
    token: CancellationToken,
) {
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticks.tick() => {
                run_guarded(Arc::clone(&runner), &guard).await;
            }
        }
    }
    debug!("digest tick loop exited");
}

async fn run_guarded(runner: Arc<DigestRunner>, guard: &OverlapGuard) -> Option<DigestReport> {
    let Some(run) = guard.try_acquire() else {
        warn!("previous digest run still in progress; skipping");
        return None;
    };

    let outcome = tokio::task::spawn_blocking(move || {
        let _run = run;
        runner.run_once()
    })
    .await;

    match outcome {
        Ok(report) => Some(report),
        Err(err) => {
            error!(error = %err, "digest run panicked");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::JobRepository;
    use crate::directory::UserRepository;
    use crate::newsletter::OutboxNotifier;
    use crate::store::MemoryStore;

    fn scheduler(period: Duration) -> DigestScheduler {
        let store = Arc::new(MemoryStore::new());
        let jobs: Arc<dyn JobRepository> = store.clone();
        let users: Arc<dyn UserRepository> = store;
        let runner = DigestRunner::new(jobs, users, Arc::new(OutboxNotifier::new()));
        DigestScheduler::new(Arc::new(runner), period)
    }

    #[tokio::test]
    async fn start_twice_is_rejected_and_stop_succeeds() {
        let scheduler = scheduler(Duration::from_secs(60));
        assert!(!scheduler.is_running().await);

        scheduler.start().await.expect("first start");
        assert!(scheduler.is_running().await);
        assert!(matches!(
            scheduler.start().await,
            Err(SchedulerError::AlreadyRunning)
        ));

        scheduler.stop().await.expect("stop");
        assert!(!scheduler.is_running().await);
        assert!(matches!(
            scheduler.stop().await,
            Err(SchedulerError::NotRunning)
        ));
    }

    #[tokio::test]
    async fn trigger_is_skipped_while_a_run_holds_the_guard() {
        let scheduler = scheduler(Duration::from_secs(60));

        let held = scheduler.guard.try_acquire().expect("guard free");
        assert!(scheduler.trigger().await.is_none());

        drop(held);
        let report = scheduler.trigger().await.expect("run executes");
        assert_eq!(report, DigestReport::default());
    }

    #[tokio::test]
    async fn scheduler_can_restart_after_stop() {
        let scheduler = scheduler(Duration::from_millis(10));
        scheduler.start().await.expect("start");
        tokio::time::sleep(Duration::from_millis(35)).await;
        scheduler.stop().await.expect("stop");

        scheduler.start().await.expect("restart");
        scheduler.stop().await.expect("stop again");
        assert!(!scheduler.guard.is_running());
    }
}
