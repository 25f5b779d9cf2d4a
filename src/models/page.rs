//! Page aggregates: what one screen of the server yields once parsed.

use super::{
    Catalogue, Project, ProjectTask, ReportFilter, ReportTotals, TimeRecord, TimeTotals, User,
};
use chrono::NaiveDate;
use serde::Serialize;

/// The day view (`time.php`): the day's records and the booking form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeListPage {
    pub date: NaiveDate,
    pub records: Vec<TimeRecord>,
    pub catalogue: Catalogue,
    /// The project→task script was found, so `catalogue` assignments are authoritative.
    pub associations_known: bool,
    pub totals: TimeTotals,
    pub error_message: Option<String>,
}

/// The record editor (`time_edit.php`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEditPage {
    pub date: NaiveDate,
    pub record: TimeRecord,
    pub catalogue: Catalogue,
    pub associations_known: bool,
    pub error_message: Option<String>,
}

/// The report form (`reports.php`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFormPage {
    pub filter: ReportFilter,
    pub catalogue: Catalogue,
    pub associations_known: bool,
    pub error_message: Option<String>,
}

/// A generated report (`report.php`) for the filter it was requested with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPage {
    pub filter: ReportFilter,
    pub records: Vec<TimeRecord>,
    /// The cached catalogue plus stand-ins for names it did not know.
    pub catalogue: Catalogue,
    pub totals: ReportTotals,
    /// The report had a Cost column, so a zero cost is a real value.
    pub cost_shown: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectsPage {
    pub projects: Vec<Project>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasksPage {
    pub tasks: Vec<ProjectTask>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub error_message: Option<String>,
}

/// Any parsed screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Page {
    TimeList(TimeListPage),
    TimeEdit(TimeEditPage),
    ReportForm(ReportFormPage),
    Report(ReportPage),
    Projects(ProjectsPage),
    Tasks(TasksPage),
    Users(UsersPage),
}

impl Page {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Page::TimeList(p) => p.error_message.as_deref(),
            Page::TimeEdit(p) => p.error_message.as_deref(),
            Page::ReportForm(p) => p.error_message.as_deref(),
            Page::Report(p) => p.error_message.as_deref(),
            Page::Projects(p) => p.error_message.as_deref(),
            Page::Tasks(p) => p.error_message.as_deref(),
            Page::Users(p) => p.error_message.as_deref(),
        }
    }
}
