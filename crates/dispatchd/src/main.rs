use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dispatch_loop;
mod retention;

use config::DaemonConfig;
use dispatch_loop::DispatchLoop;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quay_dispatchd=debug,quay_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = DaemonConfig::from_env();
    tracing::info!(
        interval_secs = config.dispatch_interval_secs,
        "Loaded daemon configuration"
    );

    // --- Database ---
    let pool = quay_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    quay_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    quay_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Background loops ---
    let cancel = CancellationToken::new();

    let dispatch = DispatchLoop::new(pool.clone(), &config);
    let dispatch_cancel = cancel.clone();
    let dispatch_handle = tokio::spawn(async move {
        dispatch.run(dispatch_cancel).await;
    });

    let retention_handle = tokio::spawn(retention::run(
        pool.clone(),
        config.telemetry_retention_days,
        cancel.clone(),
    ));

    tracing::info!("quay-dispatchd started");

    // --- Shutdown ---
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("Shutdown signal received");
    cancel.cancel();

    let _ = dispatch_handle.await;
    let _ = retention_handle.await;
    tracing::info!("quay-dispatchd stopped");
}
