//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (every minute)
//!     │
//!     └─► run_expiry_sweep(now)
//!             ├─► StartSession::delete_expired
//!             ├─► VerificationCode::delete_expired
//!             └─► AdminAction::delete_expired
//! ```
//!
//! The sweep only keeps tables small. Every read still checks `expires_at`
//! itself, so a late or failed sweep never lets an expired record through.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::admin::models::AdminAction;
use crate::domains::linking::models::StartSession;
use crate::domains::verification::models::VerificationCode;

/// Rows removed by one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub start_sessions: u64,
    pub verification_codes: u64,
    pub admin_actions: u64,
}

impl SweepStats {
    pub fn total(&self) -> u64 {
        self.start_sessions + self.verification_codes + self.admin_actions
    }
}

/// Start all scheduled tasks
pub async fn start_scheduler(pool: PgPool) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Expiry sweep - runs at second 0 of every minute
    let sweep_pool = pool.clone();
    let sweep_job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let pool = sweep_pool.clone();
        Box::pin(async move {
            if let Err(e) = run_expiry_sweep(&pool, Utc::now()).await {
                tracing::error!("Expiry sweep failed: {}", e);
            }
        })
    })?;

    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (expiry sweep every minute)");
    Ok(scheduler)
}

/// Delete every record whose `expires_at` is before `now`.
pub async fn run_expiry_sweep(pool: &PgPool, now: DateTime<Utc>) -> Result<SweepStats> {
    let stats = SweepStats {
        start_sessions: StartSession::delete_expired(now, pool).await?,
        verification_codes: VerificationCode::delete_expired(now, pool).await?,
        admin_actions: AdminAction::delete_expired(now, pool).await?,
    };

    if stats.total() > 0 {
        tracing::info!(
            start_sessions = stats.start_sessions,
            verification_codes = stats.verification_codes,
            admin_actions = stats.admin_actions,
            "Expired records swept"
        );
    }
    Ok(stats)
}
