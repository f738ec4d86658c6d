//! Repository for the `worker_anomalies` table.

use sqlx::PgPool;

use quay_core::types::Timestamp;

use crate::models::telemetry::{AnomalyRecord, RecordAnomaly, WorkerEventCount};

/// Column list for `worker_anomalies` queries.
const COLUMNS: &str = "id, worker_id, rule, detected_at";

/// Provides operations for worker anomaly telemetry.
pub struct AnomalyRepo;

impl AnomalyRepo {
    /// Record one anomaly against a worker. `detected_at` defaults to the
    /// db clock.
    pub async fn record(pool: &PgPool, input: &RecordAnomaly) -> Result<AnomalyRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO worker_anomalies (worker_id, rule, detected_at) \
             VALUES ($1, $2, COALESCE($3, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnomalyRecord>(&query)
            .bind(input.worker_id)
            .bind(&input.rule)
            .bind(input.detected_at)
            .fetch_one(pool)
            .await
    }

    /// Per-worker anomaly counts since `cutoff`.
    pub async fn counts_since(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<WorkerEventCount>, sqlx::Error> {
        sqlx::query_as::<_, WorkerEventCount>(
            "SELECT worker_id, COUNT(*) AS count \
             FROM worker_anomalies \
             WHERE detected_at >= $1 \
             GROUP BY worker_id",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Delete records older than `cutoff`. Returns the number removed.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM worker_anomalies WHERE detected_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
