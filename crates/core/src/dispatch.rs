//! Pure dispatch logic: eligibility screening and least-loaded selection.
//!
//! Pure functions and constants used by the engine and the daemon. Lives in
//! `core` to maintain the zero internal dependency constraint.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default trailing window for health/activity metrics, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Default maximum anomaly count tolerated within the window.
pub const DEFAULT_MAX_ANOMALIES: i64 = 5;

/// Default minimum activity count required within the window.
pub const DEFAULT_MIN_ACTIVITY: i64 = 10;

// ---------------------------------------------------------------------------
// Run parameters
// ---------------------------------------------------------------------------

/// Parameters for one dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchParams {
    /// Wall-clock reference the trailing window is anchored to.
    pub now: Timestamp,
    /// Trailing window length in days.
    pub window_days: i64,
    /// Anomaly ceiling: workers above this count are excluded.
    pub max_anomalies: i64,
    /// Activity floor: workers below this count are excluded.
    pub min_activity: i64,
}

impl DispatchParams {
    /// Parameters with the default thresholds, anchored at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now,
            window_days: DEFAULT_WINDOW_DAYS,
            max_anomalies: DEFAULT_MAX_ANOMALIES,
            min_activity: DEFAULT_MIN_ACTIVITY,
        }
    }

    /// Start of the trailing metrics window.
    pub fn window_start(&self) -> Timestamp {
        self.now - chrono::Duration::days(self.window_days)
    }

    /// Reject parameter combinations that cannot describe a run.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.window_days < 1 {
            return Err(CoreError::Validation(
                "window_days must be at least 1".to_string(),
            ));
        }
        if self.max_anomalies < 0 {
            return Err(CoreError::Validation(
                "max_anomalies must not be negative".to_string(),
            ));
        }
        if self.min_activity < 0 {
            return Err(CoreError::Validation(
                "min_activity must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// One item-to-worker pairing produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentRecord {
    pub item_id: DbId,
    pub worker_id: DbId,
}

/// Structured result of one dispatch run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// No pending work items existed; nothing was done.
    NoWorkPending { message: String },
    /// Pending work existed but no worker passed the eligibility screen.
    NoEligibleWorkers { message: String },
    /// The run committed; `assignments` lists every item assigned.
    Assigned {
        count: usize,
        assignments: Vec<AssignmentRecord>,
    },
    /// A store fault aborted the run; all writes were rolled back.
    Failed { error: String },
}

// ---------------------------------------------------------------------------
// Eligibility screen
// ---------------------------------------------------------------------------

/// Screen activated workers against the anomaly ceiling and activity floor.
///
/// Workers missing from either count map default to zero, so a quiet worker
/// fails only the activity floor, never the anomaly ceiling. Preserves the
/// order of `activated`.
pub fn screen_workers(
    activated: &[DbId],
    anomalies: &HashMap<DbId, i64>,
    activity: &HashMap<DbId, i64>,
    max_anomalies: i64,
    min_activity: i64,
) -> Vec<DbId> {
    activated
        .iter()
        .copied()
        .filter(|id| {
            let anomaly_count = anomalies.get(id).copied().unwrap_or(0);
            let activity_count = activity.get(id).copied().unwrap_or(0);
            anomaly_count <= max_anomalies && activity_count >= min_activity
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Least-loaded selection
// ---------------------------------------------------------------------------

/// Pick the worker with the minimum current load.
///
/// Ties break toward the lowest worker id so runs are reproducible.
pub fn pick_least_loaded(loads: &BTreeMap<DbId, i64>) -> Option<DbId> {
    loads
        .iter()
        .map(|(id, load)| (*load, *id))
        .min()
        .map(|(_, id)| id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
