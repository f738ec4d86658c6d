//! Work item entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use quay_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the `work_items` table.
///
/// `created_at` is nullable: rows imported from the legacy system may carry
/// no creation timestamp, and the pending ordering sorts those first.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkItem {
    pub id: DbId,
    pub reference: String,
    pub status_id: StatusId,
    pub worker_id: Option<DbId>,
    pub created_at: Option<Timestamp>,
    pub assigned_at: Option<Timestamp>,
}

/// DTO for submitting a new work item. Enters the queue as `Pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitWorkItem {
    pub reference: String,
    /// Defaults to the database clock when absent.
    pub created_at: Option<Timestamp>,
}

/// Per-worker count of items currently held (non-terminal states).
#[derive(Debug, Clone, FromRow)]
pub struct WorkerLoad {
    pub worker_id: DbId,
    pub count: i64,
}

/// Per-worker workload breakdown by status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkloadSummary {
    pub worker_id: DbId,
    pub name: String,
    pub assigned: i64,
    pub in_progress: i64,
    pub done: i64,
    pub cancelled: i64,
    pub total: i64,
}

/// Aggregate view of the pending backlog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueStats {
    pub pending: i64,
    pub oldest_created_at: Option<Timestamp>,
}
