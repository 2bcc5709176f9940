use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryResumeStore, TracingNotifier};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_board::applications::ApplicationService;
use job_board::catalog::CatalogService;
use job_board::config::AppConfig;
use job_board::directory::DirectoryService;
use job_board::error::AppError;
use job_board::newsletter::{DigestRunner, DigestScheduler};
use job_board::session::SessionKeys;
use job_board::store::MemoryStore;
use job_board::telemetry;
use job_board::uploads::{ResumeStore, UploadPolicy};
use job_board::{board_router, BoardState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryStore::new());
    let resumes: Arc<dyn ResumeStore> = Arc::new(InMemoryResumeStore::default());
    let sessions = Arc::new(SessionKeys::from_config(&config.session));
    let uploads = UploadPolicy::new(config.uploads.max_resume_bytes);

    let state = BoardState {
        directory: Arc::new(DirectoryService::new(
            store.clone(),
            resumes.clone(),
            sessions.clone(),
            uploads.clone(),
        )),
        catalog: Arc::new(CatalogService::new(store.clone())),
        applications: Arc::new(ApplicationService::new(
            store.clone(),
            store.clone(),
            resumes,
            uploads,
        )),
        sessions,
    };

    let scheduler = if config.newsletter.enabled {
        let notifier = Arc::new(TracingNotifier::new(config.newsletter.mail_from.clone()));
        let runner = Arc::new(DigestRunner::new(store.clone(), store.clone(), notifier));
        let scheduler = DigestScheduler::new(runner, config.newsletter.interval());
        scheduler.start().await?;
        Some(scheduler)
    } else {
        info!("niche digest disabled by configuration");
        None
    };

    let app = with_operational_routes(board_router(state))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job board ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    readiness_flag.store(false, Ordering::Release);
    if let Some(scheduler) = scheduler {
        scheduler.stop().await?;
    }
    info!("job board stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
