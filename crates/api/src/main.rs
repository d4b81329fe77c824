use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use domain::services::{MockPaymentProcessor, MockPayoutProvider};
use tracing::info;

use donation_platform_api::app::{build_cache, cache_strategy, create_app, AppState};
use donation_platform_api::config::Config;
use donation_platform_api::extractors::DEFAULT_ACTOR;
use donation_platform_api::jobs::{
    CachePurgeJob, JobScheduler, MessageDispatchJob, PayoutBatchJob, PoolMetricsJob,
    RecurringDonationJob,
};
use donation_platform_api::middleware::{init_metrics, logging::init_logging};
use donation_platform_api::services::MessagingService;

const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.logging).context("Failed to initialize logging")?;
    init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting donation platform API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&(&config.database).into())
        .await
        .context("Failed to create database pool")?;
    persistence::schema::apply(&pool)
        .await
        .context("Failed to apply database schema")?;

    let memory_cache = build_cache(&config.cache);
    let cache = cache_strategy(memory_cache.clone());
    let config = Arc::new(config);
    let state = AppState::new(config.clone(), pool.clone(), cache);

    state
        .settings
        .seed_from(&config.settings, DEFAULT_ACTOR)
        .await
        .context("Failed to seed settings")?;

    let mut scheduler = build_scheduler(&state, memory_cache);
    scheduler.start();

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(JOB_SHUTDOWN_TIMEOUT).await;
    info!("Shutdown complete");
    Ok(())
}

fn build_scheduler(
    state: &AppState,
    memory_cache: Option<persistence::cache::MemoryCache>,
) -> JobScheduler {
    let jobs = &state.config.jobs;
    let mut scheduler = JobScheduler::new();

    if jobs.recurring_donations.enabled {
        scheduler.register(RecurringDonationJob::new(
            state.donations.clone(),
            state.campaigns.clone(),
            Arc::new(MockPaymentProcessor::new()),
            jobs.recurring_donations.clone(),
        ));
    }
    if jobs.message_dispatch.enabled {
        scheduler.register(MessageDispatchJob::new(
            state.messages.clone(),
            Arc::new(MessagingService::new(
                state.config.email.clone(),
                state.config.sms.clone(),
            )),
            jobs.message_dispatch.clone(),
        ));
    }
    if jobs.payout_batch.enabled {
        scheduler.register(PayoutBatchJob::new(
            state.repository(),
            Arc::new(MockPayoutProvider::new()),
            jobs.payout_batch.clone(),
        ));
    }

    scheduler.register(PoolMetricsJob::new(state.pool.clone()));
    if let Some(cache) = memory_cache {
        scheduler.register(CachePurgeJob::new(cache));
    }
    scheduler
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
                    _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully"),
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
                info!("Received Ctrl+C, shutting down gracefully");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl+C, shutting down gracefully");
    }
}
