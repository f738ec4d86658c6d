//! Repository for the `worker_activity_log` table.

use sqlx::PgPool;

use quay_core::types::Timestamp;

use crate::models::telemetry::{ActivityLogEntry, RecordActivity, WorkerEventCount};

/// Column list for `worker_activity_log` queries.
const COLUMNS: &str = "id, worker_id, activity_type, recorded_at";

/// Provides operations for worker activity telemetry.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Record one activity entry. `recorded_at` defaults to the db clock.
    pub async fn record(
        pool: &PgPool,
        input: &RecordActivity,
    ) -> Result<ActivityLogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO worker_activity_log (worker_id, activity_type, recorded_at) \
             VALUES ($1, $2, COALESCE($3, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLogEntry>(&query)
            .bind(input.worker_id)
            .bind(&input.activity_type)
            .bind(input.recorded_at)
            .fetch_one(pool)
            .await
    }

    /// Per-worker activity counts since `cutoff`.
    ///
    /// Workers with no entries in the window are simply absent.
    pub async fn counts_since(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<WorkerEventCount>, sqlx::Error> {
        sqlx::query_as::<_, WorkerEventCount>(
            "SELECT worker_id, COUNT(*) AS count \
             FROM worker_activity_log \
             WHERE recorded_at >= $1 \
             GROUP BY worker_id",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Delete entries older than `cutoff`. Returns the number removed.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM worker_activity_log WHERE recorded_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
