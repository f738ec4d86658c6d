//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod anomaly_repo;
pub mod work_item_repo;
pub mod worker_repo;

pub use activity_repo::ActivityLogRepo;
pub use anomaly_repo::AnomalyRepo;
pub use work_item_repo::WorkItemRepo;
pub use worker_repo::WorkerRepo;
