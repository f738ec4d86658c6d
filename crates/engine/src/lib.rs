//! The dispatch engine.
//!
//! Selects eligible workers and pending work items, then greedily assigns
//! each item to the least-loaded worker, committing all writes as one
//! transaction.

mod dispatcher;

pub use dispatcher::{Dispatcher, EngineError};
