//! Dispatch run orchestration.
//!
//! One run is two read-only selections followed by a greedy assignment pass
//! whose writes all land in a single transaction. Each write carries a
//! conditional status guard, so concurrent runs resolve races as "first
//! writer wins, loser skips" without any row locking.

use std::collections::{BTreeMap, HashMap};

use sqlx::PgPool;

use quay_core::dispatch::{self, AssignmentRecord, DispatchOutcome, DispatchParams};
use quay_core::error::CoreError;
use quay_core::types::DbId;
use quay_db::repositories::{ActivityLogRepo, AnomalyRepo, WorkItemRepo, WorkerRepo};

/// Faults that abort a dispatch run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The store was unreachable or a query failed unexpectedly.
    #[error("store fault: {0}")]
    Store(#[from] sqlx::Error),

    /// The run was invoked with unusable parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] CoreError),
}

/// Entry point for dispatch runs.
pub struct Dispatcher;

impl Dispatcher {
    /// Execute one dispatch run.
    ///
    /// Never propagates a fault: a genuine error rolls back every write of
    /// the run and is folded into [`DispatchOutcome::Failed`]. Callers that
    /// want the run retried must trigger a new one.
    pub async fn run(pool: &PgPool, params: &DispatchParams) -> DispatchOutcome {
        match Self::try_run(pool, params).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Dispatch run failed");
                DispatchOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_run(
        pool: &PgPool,
        params: &DispatchParams,
    ) -> Result<DispatchOutcome, EngineError> {
        params.validate()?;

        let pending = WorkItemRepo::pending_ids(pool).await?;
        if pending.is_empty() {
            tracing::debug!("No pending work items");
            return Ok(DispatchOutcome::NoWorkPending {
                message: "no pending work items to dispatch".to_string(),
            });
        }

        let eligible = Self::eligible_workers(pool, params).await?;
        if eligible.is_empty() {
            tracing::warn!(
                pending = pending.len(),
                "Pending work but no eligible workers"
            );
            return Ok(DispatchOutcome::NoEligibleWorkers {
                message: "no eligible workers available for dispatch".to_string(),
            });
        }

        // Seed the per-run load counters from persisted assignment counts;
        // eligible workers holding nothing start at zero.
        let persisted: HashMap<DbId, i64> = WorkItemRepo::load_per_worker(pool)
            .await?
            .into_iter()
            .map(|l| (l.worker_id, l.count))
            .collect();
        let mut loads: BTreeMap<DbId, i64> = eligible
            .iter()
            .map(|id| (*id, persisted.get(id).copied().unwrap_or(0)))
            .collect();

        let mut tx = pool.begin().await?;
        let mut assignments: Vec<AssignmentRecord> = Vec::new();

        for item_id in pending {
            let Some(worker_id) = dispatch::pick_least_loaded(&loads) else {
                break;
            };
            if WorkItemRepo::assign(&mut tx, item_id, worker_id).await? {
                assignments.push(AssignmentRecord { item_id, worker_id });
                *loads.entry(worker_id).or_insert(0) += 1;
            } else {
                // Another run claimed the item between selection and write.
                tracing::debug!(item_id, "Work item no longer pending, skipped");
            }
        }

        tx.commit().await?;

        tracing::info!(assigned = assignments.len(), "Dispatch run committed");
        Ok(DispatchOutcome::Assigned {
            count: assignments.len(),
            assignments,
        })
    }

    /// Eligibility selection: activated workers screened by trailing-window
    /// anomaly and activity counts.
    async fn eligible_workers(
        pool: &PgPool,
        params: &DispatchParams,
    ) -> Result<Vec<DbId>, EngineError> {
        let activated = WorkerRepo::activated_ids(pool).await?;
        if activated.is_empty() {
            return Ok(Vec::new());
        }

        let cutoff = params.window_start();
        let anomalies: HashMap<DbId, i64> = AnomalyRepo::counts_since(pool, cutoff)
            .await?
            .into_iter()
            .map(|c| (c.worker_id, c.count))
            .collect();
        let activity: HashMap<DbId, i64> = ActivityLogRepo::counts_since(pool, cutoff)
            .await?
            .into_iter()
            .map(|c| (c.worker_id, c.count))
            .collect();

        Ok(dispatch::screen_workers(
            &activated,
            &anomalies,
            &activity,
            params.max_anomalies,
            params.min_activity,
        ))
    }
}
