use quay_core::dispatch::{DEFAULT_MAX_ANOMALIES, DEFAULT_MIN_ACTIVITY, DEFAULT_WINDOW_DAYS};

/// Daemon configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Postgres connection string. Required.
    pub database_url: String,
    /// Seconds between dispatch runs (default: `300`).
    pub dispatch_interval_secs: u64,
    /// Trailing metrics window in days (default: `7`).
    pub window_days: i64,
    /// Anomaly ceiling for eligibility (default: `5`).
    pub max_anomalies: i64,
    /// Activity floor for eligibility (default: `10`).
    pub min_activity: i64,
    /// Days of telemetry to keep (default: `90`).
    pub telemetry_retention_days: i64,
}

impl DaemonConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default    |
    /// |----------------------------|------------|
    /// | `DATABASE_URL`             | (required) |
    /// | `DISPATCH_INTERVAL_SECS`   | `300`      |
    /// | `DISPATCH_WINDOW_DAYS`     | `7`        |
    /// | `DISPATCH_MAX_ANOMALIES`   | `5`        |
    /// | `DISPATCH_MIN_ACTIVITY`    | `10`       |
    /// | `TELEMETRY_RETENTION_DAYS` | `90`       |
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let dispatch_interval_secs: u64 = std::env::var("DISPATCH_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("DISPATCH_INTERVAL_SECS must be a valid u64");

        let window_days: i64 = std::env::var("DISPATCH_WINDOW_DAYS")
            .unwrap_or_else(|_| DEFAULT_WINDOW_DAYS.to_string())
            .parse()
            .expect("DISPATCH_WINDOW_DAYS must be a valid i64");

        let max_anomalies: i64 = std::env::var("DISPATCH_MAX_ANOMALIES")
            .unwrap_or_else(|_| DEFAULT_MAX_ANOMALIES.to_string())
            .parse()
            .expect("DISPATCH_MAX_ANOMALIES must be a valid i64");

        let min_activity: i64 = std::env::var("DISPATCH_MIN_ACTIVITY")
            .unwrap_or_else(|_| DEFAULT_MIN_ACTIVITY.to_string())
            .parse()
            .expect("DISPATCH_MIN_ACTIVITY must be a valid i64");

        let telemetry_retention_days: i64 = std::env::var("TELEMETRY_RETENTION_DAYS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("TELEMETRY_RETENTION_DAYS must be a valid i64");

        Self {
            database_url,
            dispatch_interval_secs,
            window_days,
            max_anomalies,
            min_activity,
            telemetry_retention_days,
        }
    }
}
