//! Repository for the `work_items` table.
//!
//! Uses `WorkItemStatus` from `models::status` for all status transitions.
//! Every transition is a guarded conditional write: the `WHERE` clause names
//! the expected current status, so a concurrent mutation makes the update a
//! no-op instead of overwriting.

use sqlx::PgPool;

use quay_core::types::DbId;

use crate::models::status::{StatusId, WorkItemStatus};
use crate::models::work_item::{QueueStats, SubmitWorkItem, WorkItem, WorkerLoad, WorkloadSummary};

/// Column list for `work_items` queries.
const COLUMNS: &str = "id, reference, status_id, worker_id, created_at, assigned_at";

/// Terminal statuses: done, cancelled.
const TERMINAL_STATUSES: [StatusId; 2] = [
    WorkItemStatus::Done as StatusId,
    WorkItemStatus::Cancelled as StatusId,
];

/// Provides queue, assignment, and lifecycle operations for work items.
pub struct WorkItemRepo;

impl WorkItemRepo {
    // ── Submission and lookup ────────────────────────────────────────────

    /// Submit a new pending work item. `created_at` defaults to the db clock.
    pub async fn submit(pool: &PgPool, input: &SubmitWorkItem) -> Result<WorkItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_items (reference, status_id, created_at) \
             VALUES ($1, $2, COALESCE($3, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkItem>(&query)
            .bind(&input.reference)
            .bind(WorkItemStatus::Pending.id())
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a work item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_items WHERE id = $1");
        sqlx::query_as::<_, WorkItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ── Dispatch selection ───────────────────────────────────────────────

    /// Ordered ids of unassigned pending items.
    ///
    /// Oldest first; items with no creation timestamp sort before everything
    /// else, ties break by id so the order is reproducible.
    pub async fn pending_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM work_items \
             WHERE status_id = $1 AND worker_id IS NULL \
             ORDER BY created_at ASC NULLS FIRST, id ASC",
        )
        .bind(WorkItemStatus::Pending.id())
        .fetch_all(pool)
        .await
    }

    /// Per-worker count of items in non-terminal assigned states.
    ///
    /// Seeds the in-memory load counters at the start of a dispatch run.
    pub async fn load_per_worker(pool: &PgPool) -> Result<Vec<WorkerLoad>, sqlx::Error> {
        sqlx::query_as::<_, WorkerLoad>(
            "SELECT worker_id, COUNT(*) AS count \
             FROM work_items \
             WHERE worker_id IS NOT NULL AND status_id IN ($1, $2) \
             GROUP BY worker_id",
        )
        .bind(WorkItemStatus::Assigned.id())
        .bind(WorkItemStatus::InProgress.id())
        .fetch_all(pool)
        .await
    }

    /// Conditionally assign a pending item to a worker, inside the run's
    /// transaction.
    ///
    /// The status guard makes this safe under concurrent runs: if another
    /// writer claimed the item after it was selected, zero rows change and
    /// `false` is returned, so the caller skips the item.
    pub async fn assign(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        item_id: DbId,
        worker_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_items \
             SET status_id = $2, worker_id = $3, assigned_at = NOW() \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(item_id)
        .bind(WorkItemStatus::Assigned.id())
        .bind(worker_id)
        .bind(WorkItemStatus::Pending.id())
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Lifecycle transitions ────────────────────────────────────────────

    /// Mark an assigned item as in progress.
    ///
    /// Returns `false` if the item was not in `Assigned`.
    pub async fn mark_in_progress(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_items SET status_id = $2 WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(WorkItemStatus::InProgress.id())
        .bind(WorkItemStatus::Assigned.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an in-progress item as done.
    ///
    /// Returns `false` if the item was not in `InProgress`.
    pub async fn complete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_items SET status_id = $2 WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(WorkItemStatus::Done.id())
        .bind(WorkItemStatus::InProgress.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cancel an item if it is not already in a terminal state.
    ///
    /// Returns `true` if the item was cancelled, `false` if it was already
    /// done or cancelled.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE work_items SET status_id = $2 \
             WHERE id = $1 AND status_id NOT IN ($3, $4)",
        )
        .bind(id)
        .bind(WorkItemStatus::Cancelled.id())
        .bind(TERMINAL_STATUSES[0])
        .bind(TERMINAL_STATUSES[1])
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Reporting ────────────────────────────────────────────────────────

    /// Per-worker workload breakdown by status, all workers included.
    pub async fn workload_by_worker(pool: &PgPool) -> Result<Vec<WorkloadSummary>, sqlx::Error> {
        sqlx::query_as::<_, WorkloadSummary>(
            "SELECT w.id AS worker_id, w.name, \
                COUNT(i.id) FILTER (WHERE i.status_id = $1) AS assigned, \
                COUNT(i.id) FILTER (WHERE i.status_id = $2) AS in_progress, \
                COUNT(i.id) FILTER (WHERE i.status_id = $3) AS done, \
                COUNT(i.id) FILTER (WHERE i.status_id = $4) AS cancelled, \
                COUNT(i.id) AS total \
             FROM workers w \
             LEFT JOIN work_items i ON i.worker_id = w.id \
             GROUP BY w.id, w.name \
             ORDER BY w.name ASC",
        )
        .bind(WorkItemStatus::Assigned.id())
        .bind(WorkItemStatus::InProgress.id())
        .bind(WorkItemStatus::Done.id())
        .bind(WorkItemStatus::Cancelled.id())
        .fetch_all(pool)
        .await
    }

    /// Size and age of the pending backlog.
    pub async fn queue_stats(pool: &PgPool) -> Result<QueueStats, sqlx::Error> {
        sqlx::query_as::<_, QueueStats>(
            "SELECT COUNT(*) AS pending, MIN(created_at) AS oldest_created_at \
             FROM work_items \
             WHERE status_id = $1 AND worker_id IS NULL",
        )
        .bind(WorkItemStatus::Pending.id())
        .fetch_one(pool)
        .await
    }
}
