use super::{ID_NONE, Location, TaskRecordStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One booking of time against a project task.
///
/// The elapsed time is either measured (`start`/`finish`) or entered
/// directly (`duration`, in milliseconds). Setting a bound clears a directly
/// entered duration so the two never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRecord {
    pub id: i64,
    pub project_id: i64,
    pub project_name: String,
    pub task_id: i64,
    pub task_name: String,
    pub date: NaiveDate,
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    pub duration: i64,
    pub note: String,
    pub cost: f64,
    pub location: Location,
    pub status: TaskRecordStatus,
    /// Local revision counter, never sent by the server.
    pub version: i64,
}

impl TimeRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: ID_NONE,
            project_id: ID_NONE,
            project_name: String::new(),
            task_id: ID_NONE,
            task_name: String::new(),
            date,
            start: None,
            finish: None,
            duration: 0,
            note: String::new(),
            cost: 0.0,
            location: Location::Empty,
            status: TaskRecordStatus::Draft,
            version: 0,
        }
    }

    pub fn has_identity(&self) -> bool {
        self.id != ID_NONE
    }

    pub fn set_start(&mut self, start: Option<NaiveDateTime>) {
        self.start = start;
        self.duration = 0;
    }

    pub fn set_finish(&mut self, finish: Option<NaiveDateTime>) {
        self.finish = finish;
        self.duration = 0;
    }

    /// Elapsed milliseconds: the entered duration, else finish − start.
    pub fn elapsed(&self) -> i64 {
        if self.duration != 0 {
            return self.duration;
        }
        match (self.start, self.finish) {
            (Some(start), Some(finish)) => (finish - start).num_milliseconds(),
            _ => 0,
        }
    }

    /// Lacks what the server needs to book it: a project, a task or some time.
    pub fn is_empty(&self) -> bool {
        self.project_id == ID_NONE || self.task_id == ID_NONE || self.elapsed() == 0
    }

    /// Copy the fields a scraped page carries onto this cached record,
    /// keeping local bookkeeping such as `version`. Cost is left alone: only
    /// a report that shows the Cost column says what it is.
    pub fn merge_remote(&mut self, remote: &TimeRecord) {
        self.project_id = remote.project_id;
        self.project_name = remote.project_name.clone();
        self.task_id = remote.task_id;
        self.task_name = remote.task_name.clone();
        self.date = remote.date;
        self.start = remote.start;
        self.finish = remote.finish;
        self.duration = remote.duration;
        self.note = remote.note.clone();
        self.status = remote.status;
        if remote.location != Location::Empty {
            self.location = remote.location;
        }
    }
}
