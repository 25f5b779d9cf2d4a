use serde::Serialize;

/// Lifecycle of a time record as seen by the client.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskRecordStatus {
    /// Not yet saved on the server.
    #[default]
    Draft,
    /// Matches the server copy.
    Current,
    /// Edited locally since the last fetch.
    Modified,
    /// Removed locally, pending removal on the server.
    Deleted,
}

impl TaskRecordStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TaskRecordStatus::Draft => "draft",
            TaskRecordStatus::Current => "current",
            TaskRecordStatus::Modified => "modified",
            TaskRecordStatus::Deleted => "deleted",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(TaskRecordStatus::Draft),
            "current" => Some(TaskRecordStatus::Current),
            "modified" => Some(TaskRecordStatus::Modified),
            "deleted" => Some(TaskRecordStatus::Deleted),
            _ => None,
        }
    }
}
