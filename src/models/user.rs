use serde::Serialize;

/// A row of the users page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// Position in the table, starting at 1; the page carries no ids.
    pub id: i64,
    pub login: String,
    pub display_name: String,
    pub roles: Vec<String>,
    /// The user has an open (unfinished) time entry.
    pub uncompleted_entry: bool,
}
