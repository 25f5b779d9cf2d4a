pub mod catalogue;
pub mod location;
pub mod page;
pub mod project;
pub mod project_task;
pub mod project_task_key;
pub mod report;
pub mod status;
pub mod time_record;
pub mod user;

pub use catalogue::Catalogue;
pub use location::Location;
pub use page::{
    Page, ProjectsPage, ReportFormPage, ReportPage, TasksPage, TimeEditPage, TimeListPage,
    UsersPage,
};
pub use project::Project;
pub use project_task::ProjectTask;
pub use project_task_key::ProjectTaskKey;
pub use report::{ReportFilter, ReportTimePeriod, ReportTotals, TimeTotals, UNKNOWN};
pub use status::TaskRecordStatus;
pub use time_record::TimeRecord;
pub use user::User;

/// Identity of an entity the server has not assigned an id to.
pub const ID_NONE: i64 = 0;
