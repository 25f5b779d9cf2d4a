use serde::Serialize;

/// Join row between a project and a task. The pair is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProjectTaskKey {
    pub project_id: i64,
    pub task_id: i64,
}

impl ProjectTaskKey {
    pub fn new(project_id: i64, task_id: i64) -> Self {
        Self {
            project_id,
            task_id,
        }
    }
}
