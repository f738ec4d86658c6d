//! Worker telemetry entity models: activity log entries and anomaly records.
//!
//! Both tables feed the eligibility screen. Activity proves a worker is
//! alive; anomalies count against it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use quay_core::types::{DbId, Timestamp};

/// A row from the `worker_activity_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLogEntry {
    pub id: DbId,
    pub worker_id: DbId,
    pub activity_type: String,
    pub recorded_at: Timestamp,
}

/// DTO for recording a worker activity entry.
///
/// `recorded_at` defaults to the database clock when absent; backfills from
/// the legacy system pass an explicit timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordActivity {
    pub worker_id: DbId,
    pub activity_type: String,
    pub recorded_at: Option<Timestamp>,
}

/// A row from the `worker_anomalies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnomalyRecord {
    pub id: DbId,
    pub worker_id: DbId,
    pub rule: String,
    pub detected_at: Timestamp,
}

/// DTO for recording a detected anomaly against a worker.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordAnomaly {
    pub worker_id: DbId,
    pub rule: String,
    pub detected_at: Option<Timestamp>,
}

/// Per-worker event count aggregate, shared by both telemetry tables.
#[derive(Debug, Clone, FromRow)]
pub struct WorkerEventCount {
    pub worker_id: DbId,
    pub count: i64,
}
