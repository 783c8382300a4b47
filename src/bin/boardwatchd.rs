//! Boardwatch daemon.
//!
//! Resolves configuration from the environment, connects to `PostgreSQL`,
//! runs one immediate poll cycle, backfills statistics history when none
//! exists, and then polls the project board on the configured cron
//! schedule until interrupted.
//!
//! Required environment: `GITHUB_TOKEN`, `BOARDWATCH_ORG`,
//! `BOARDWATCH_PROJECT_NUMBER`, `DATABASE_URL`. Optional:
//! `BOARDWATCH_POLL_CRON`, `BOARDWATCH_BACKFILL_DAYS`,
//! `BOARDWATCH_FETCH_TIMEOUT_SECS`, `RUST_LOG`.

use boardwatch::config::TrackerConfig;
use boardwatch::tracker::adapters::github::GitHubProjectSource;
use boardwatch::tracker::adapters::postgres::{PostgresTrackerRepository, TrackerPgPool};
use boardwatch::tracker::ports::TrackerRepository;
use boardwatch::tracker::services::{BackfillService, PollScheduler, PollService};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // A missing project identity is fatal: the daemon must not start
    // serving without it.
    let config = TrackerConfig::from_env()?;
    run(config).await
}

async fn run(config: TrackerConfig) -> Result<(), BoxError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    let pool: TrackerPgPool = Pool::builder().build(manager)?;
    let repository = Arc::new(PostgresTrackerRepository::new(pool));
    let source = Arc::new(GitHubProjectSource::new(
        config.github_token.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    )?);
    let clock = Arc::new(DefaultClock);

    let service = PollService::new(
        source,
        Arc::clone(&repository),
        Arc::clone(&clock),
        config.project.clone(),
    );
    let scheduler = PollScheduler::new(service, Arc::clone(&clock));
    let backfill = BackfillService::new(Arc::clone(&repository), Arc::clone(&clock));

    // Capture the history state before the initial cycle writes today's
    // statistics row, then poll so the backfill has tasks to work from.
    let had_history = match repository.has_daily_statistics().await {
        Ok(present) => present,
        Err(err) => {
            tracing::error!(error = %err, "history check failed, skipping backfill");
            true
        }
    };

    // One immediate cycle so a fresh deployment has data before the first
    // scheduled tick.
    scheduler.trigger().await;

    if !had_history {
        match backfill.backfill(config.backfill_days).await {
            Ok(days) => tracing::info!(days, "statistics history backfilled"),
            Err(err) => tracing::error!(error = %err, "startup backfill failed"),
        }
    }

    let cron = JobScheduler::new().await?;
    let job_handle = scheduler.clone();
    let job = Job::new_async(config.poll_cron.as_str(), move |_id, _lock| {
        let tick_scheduler = job_handle.clone();
        Box::pin(async move {
            tick_scheduler.trigger().await;
        })
    })?;
    cron.add(job).await?;
    cron.start().await?;
    tracing::info!(
        schedule = %config.poll_cron,
        project = %config.project,
        "boardwatch daemon started"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    Ok(())
}
