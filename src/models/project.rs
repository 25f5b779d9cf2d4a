use super::ID_NONE;
use serde::Serialize;

/// A project and the ids of the tasks that may be booked against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub task_ids: Vec<i64>,
}

impl Project {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: String::new(),
            task_ids: Vec::new(),
        }
    }

    /// A project known only by the name shown on a page.
    pub fn stand_in(name: &str) -> Self {
        Self::new(ID_NONE, name)
    }

    pub fn has_identity(&self) -> bool {
        self.id != ID_NONE
    }
}
