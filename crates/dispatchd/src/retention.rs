//! Periodic cleanup of old worker telemetry.
//!
//! Deletes activity and anomaly rows that have aged out of any eligibility
//! window. Runs on a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use quay_db::repositories::{ActivityLogRepo, AnomalyRepo};

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the telemetry retention loop.
///
/// Purges rows older than `retention_days`. Runs until `cancel` triggers.
pub async fn run(pool: PgPool, retention_days: i64, cancel: CancellationToken) {
    tracing::info!(
        retention_days,
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Telemetry retention job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Telemetry retention job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::days(retention_days);

                match ActivityLogRepo::delete_older_than(&pool, cutoff).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Purged old activity entries");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Activity retention cleanup failed");
                    }
                }

                match AnomalyRepo::delete_older_than(&pool, cutoff).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Purged old anomaly records");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Anomaly retention cleanup failed");
                    }
                }
            }
        }
    }
}
