use super::ID_NONE;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTask {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl ProjectTask {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: String::new(),
        }
    }

    /// A task known only by the name shown on a page.
    pub fn stand_in(name: &str) -> Self {
        Self::new(ID_NONE, name)
    }

    pub fn has_identity(&self) -> bool {
        self.id != ID_NONE
    }
}
