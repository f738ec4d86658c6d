//! Integration tests for the worker registry and telemetry repositories.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use quay_db::models::telemetry::{RecordActivity, RecordAnomaly};
use quay_db::models::worker::RegisterWorker;
use quay_db::repositories::{ActivityLogRepo, AnomalyRepo, WorkerRepo};

fn register(name: &str) -> RegisterWorker {
    RegisterWorker {
        name: name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_starts_deactivated(pool: PgPool) {
    let worker = WorkerRepo::register(&pool, &register("berth-01")).await.unwrap();
    assert!(!worker.is_activated);
    assert_eq!(worker.name, "berth-01");

    let found = WorkerRepo::find_by_id(&pool, worker.id).await.unwrap().unwrap();
    assert_eq!(found.name, "berth-01");
    assert!(WorkerRepo::find_by_id(&pool, worker.id + 1).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_is_idempotent_on_name(pool: PgPool) {
    let first = WorkerRepo::register(&pool, &register("berth-01")).await.unwrap();
    let second = WorkerRepo::register(&pool, &register("berth-01")).await.unwrap();
    assert_eq!(first.id, second.id);

    let all = WorkerRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activate_and_deactivate(pool: PgPool) {
    let worker = WorkerRepo::register(&pool, &register("berth-01")).await.unwrap();

    let activated = WorkerRepo::activate(&pool, worker.id).await.unwrap().unwrap();
    assert!(activated.is_activated);

    let deactivated = WorkerRepo::deactivate(&pool, worker.id).await.unwrap().unwrap();
    assert!(!deactivated.is_activated);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activate_unknown_worker_returns_none(pool: PgPool) {
    assert!(WorkerRepo::activate(&pool, 9999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn activated_ids_filters_and_orders(pool: PgPool) {
    let a = WorkerRepo::register(&pool, &register("berth-01")).await.unwrap();
    // berth-02 stays deactivated.
    WorkerRepo::register(&pool, &register("berth-02")).await.unwrap();
    let c = WorkerRepo::register(&pool, &register("berth-03")).await.unwrap();

    WorkerRepo::activate(&pool, c.id).await.unwrap();
    WorkerRepo::activate(&pool, a.id).await.unwrap();

    let ids = WorkerRepo::activated_ids(&pool).await.unwrap();
    assert_eq!(ids, vec![a.id, c.id]);
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn activity_counts_respect_cutoff(pool: PgPool) {
    let worker = WorkerRepo::register(&pool, &register("berth-01")).await.unwrap();

    let now = Utc::now();
    for days_ago in [1, 2, 20] {
        ActivityLogRepo::record(
            &pool,
            &RecordActivity {
                worker_id: worker.id,
                activity_type: "clearance_review".to_string(),
                recorded_at: Some(now - Duration::days(days_ago)),
            },
        )
        .await
        .unwrap();
    }

    let counts = ActivityLogRepo::counts_since(&pool, now - Duration::days(7))
        .await
        .unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].worker_id, worker.id);
    assert_eq!(counts[0].count, 2, "the 20-day-old entry is outside the window");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn anomaly_counts_group_by_worker(pool: PgPool) {
    let a = WorkerRepo::register(&pool, &register("berth-01")).await.unwrap();
    let b = WorkerRepo::register(&pool, &register("berth-02")).await.unwrap();

    for _ in 0..3 {
        AnomalyRepo::record(
            &pool,
            &RecordAnomaly {
                worker_id: a.id,
                rule: "idle_session".to_string(),
                detected_at: None,
            },
        )
        .await
        .unwrap();
    }
    AnomalyRepo::record(
        &pool,
        &RecordAnomaly {
            worker_id: b.id,
            rule: "idle_session".to_string(),
            detected_at: None,
        },
    )
    .await
    .unwrap();

    let mut counts = AnomalyRepo::counts_since(&pool, Utc::now() - Duration::days(7))
        .await
        .unwrap();
    counts.sort_by_key(|c| c.worker_id);
    assert_eq!(counts.len(), 2);
    assert_eq!((counts[0].worker_id, counts[0].count), (a.id, 3));
    assert_eq!((counts[1].worker_id, counts[1].count), (b.id, 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn retention_purges_only_old_entries(pool: PgPool) {
    let worker = WorkerRepo::register(&pool, &register("berth-01")).await.unwrap();

    let now = Utc::now();
    for days_ago in [1, 100, 200] {
        ActivityLogRepo::record(
            &pool,
            &RecordActivity {
                worker_id: worker.id,
                activity_type: "clearance_review".to_string(),
                recorded_at: Some(now - Duration::days(days_ago)),
            },
        )
        .await
        .unwrap();
        AnomalyRepo::record(
            &pool,
            &RecordAnomaly {
                worker_id: worker.id,
                rule: "idle_session".to_string(),
                detected_at: Some(now - Duration::days(days_ago)),
            },
        )
        .await
        .unwrap();
    }

    let cutoff = now - Duration::days(90);
    assert_eq!(ActivityLogRepo::delete_older_than(&pool, cutoff).await.unwrap(), 2);
    assert_eq!(AnomalyRepo::delete_older_than(&pool, cutoff).await.unwrap(), 2);

    let remaining = ActivityLogRepo::counts_since(&pool, now - Duration::days(365))
        .await
        .unwrap();
    assert_eq!(remaining[0].count, 1, "the recent entry survives");
}
