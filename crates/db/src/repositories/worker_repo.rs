//! Repository for the `workers` table.

use sqlx::PgPool;

use quay_core::types::DbId;

use crate::models::worker::{RegisterWorker, Worker};

/// Column list for `workers` queries.
const COLUMNS: &str = "id, name, is_activated, created_at, updated_at";

/// Provides CRUD operations for the worker registry.
pub struct WorkerRepo;

impl WorkerRepo {
    /// Register a new worker, or touch `updated_at` on name conflict.
    ///
    /// Workers start deactivated; activation is a separate, explicit step.
    pub async fn register(pool: &PgPool, input: &RegisterWorker) -> Result<Worker, sqlx::Error> {
        let query = format!(
            "INSERT INTO workers (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Worker>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a worker by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workers WHERE id = $1");
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all workers ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Worker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workers ORDER BY name ASC");
        sqlx::query_as::<_, Worker>(&query).fetch_all(pool).await
    }

    /// Ids of all activated workers, ordered by id for stable iteration.
    pub async fn activated_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM workers WHERE is_activated = true ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Activate a worker so it can receive assignments.
    pub async fn activate(pool: &PgPool, id: DbId) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!(
            "UPDATE workers SET is_activated = true, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a worker. Items already assigned to it are untouched.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<Option<Worker>, sqlx::Error> {
        let query = format!(
            "UPDATE workers SET is_activated = false, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Worker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
