//! Periodic dispatch trigger.
//!
//! A single long-lived Tokio task that invokes the engine on a fixed
//! interval (five minutes unless configured otherwise). A failed run is
//! logged and left for the next tick; the daemon never retries within a
//! tick.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use quay_core::dispatch::{DispatchOutcome, DispatchParams};
use quay_engine::Dispatcher;

use crate::config::DaemonConfig;

/// Periodic dispatch runner.
pub struct DispatchLoop {
    pool: PgPool,
    interval: Duration,
    window_days: i64,
    max_anomalies: i64,
    min_activity: i64,
}

impl DispatchLoop {
    pub fn new(pool: PgPool, config: &DaemonConfig) -> Self {
        Self {
            pool,
            interval: Duration::from_secs(config.dispatch_interval_secs),
            window_days: config.window_days,
            max_anomalies: config.max_anomalies,
            min_activity: config.min_activity,
        }
    }

    /// Run the dispatch loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            window_days = self.window_days,
            max_anomalies = self.max_anomalies,
            min_activity = self.min_activity,
            "Dispatch loop started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Dispatch loop shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// One trigger: run the engine and log the structured outcome.
    async fn tick(&self) {
        let params = DispatchParams {
            now: Utc::now(),
            window_days: self.window_days,
            max_anomalies: self.max_anomalies,
            min_activity: self.min_activity,
        };

        match Dispatcher::run(&self.pool, &params).await {
            DispatchOutcome::Assigned { count, assignments } => {
                for record in &assignments {
                    tracing::debug!(
                        item_id = record.item_id,
                        worker_id = record.worker_id,
                        "Work item assigned"
                    );
                }
                tracing::info!(count, "Dispatch run assigned work");
            }
            DispatchOutcome::NoWorkPending { message } => {
                tracing::debug!(%message, "Nothing to dispatch");
            }
            DispatchOutcome::NoEligibleWorkers { message } => {
                tracing::warn!(%message, "Pending work left in the queue");
            }
            DispatchOutcome::Failed { error } => {
                tracing::error!(%error, "Dispatch run failed, will retry next tick");
            }
        }
    }
}
