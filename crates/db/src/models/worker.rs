//! Worker registry entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use quay_core::types::{DbId, Timestamp};

/// A row from the `workers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Worker {
    pub id: DbId,
    pub name: String,
    pub is_activated: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new worker.
///
/// Registration is idempotent on `name`; workers start deactivated and must
/// be activated before they can receive work.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterWorker {
    pub name: String,
}
