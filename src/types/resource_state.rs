use aws_sdk_dynamodb::types::TableStatus;
use serde::Serialize;
use std::fmt;

/// Lifecycle state of a remote table as observed while polling.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceState {
    Creating,
    Active,
    Deleting,
    Absent,
    Failed(String),
}

impl ResourceState {
    /// States only move forward: Creating -> Active | Failed, Deleting -> Absent.
    /// Observing the current state again is always allowed.
    pub fn can_become(&self, next: &ResourceState) -> bool {
        use ResourceState::*;

        match (self, next) {
            (a, b) if a == b => true,
            (Creating, Active) | (Creating, Failed(_)) => true,
            (Deleting, Absent) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceState::Creating => write!(f, "CREATING"),
            ResourceState::Active => write!(f, "ACTIVE"),
            ResourceState::Deleting => write!(f, "DELETING"),
            ResourceState::Absent => write!(f, "ABSENT"),
            ResourceState::Failed(reason) => write!(f, "FAILED ({reason})"),
        }
    }
}

impl From<TableStatus> for ResourceState {
    fn from(status: TableStatus) -> ResourceState {
        match status {
            TableStatus::Creating => ResourceState::Creating,
            TableStatus::Active => ResourceState::Active,
            TableStatus::Deleting => ResourceState::Deleting,
            // Still settling; only ACTIVE ends a creation.
            TableStatus::Updating => ResourceState::Creating,
            other => ResourceState::Failed(other.as_str().to_string()),
        }
    }
}
