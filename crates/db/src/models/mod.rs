//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Aggregate DTOs where a repository returns grouped counts

pub mod status;
pub mod telemetry;
pub mod work_item;
pub mod worker;
