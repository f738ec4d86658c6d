//! Work item status ids mapping to the `work_item_statuses` lookup table.
//!
//! Variant discriminants match the seed data order (1-based SMALLSERIAL).

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Work item lifecycle status.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkItemStatus {
    Pending = 1,
    Assigned = 2,
    InProgress = 3,
    Done = 4,
    Cancelled = 5,
}

impl WorkItemStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Done and Cancelled admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkItemStatus::Done | WorkItemStatus::Cancelled)
    }
}

impl From<WorkItemStatus> for StatusId {
    fn from(value: WorkItemStatus) -> Self {
        value as StatusId
    }
}
