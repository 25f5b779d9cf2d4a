//! Local store: one collection per cached entity, plus the scoped lookups
//! and cascades reconciliation needs. Every collection borrows a plain
//! `Connection`, so it works the same inside a transaction.

use crate::errors::{AppError, AppResult};
use crate::models::{
    Catalogue, ID_NONE, Location, Project, ProjectTask, ProjectTaskKey, TaskRecordStatus,
    TimeRecord,
};
use crate::utils::time::{DATE_FORMAT, format_system_date};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Result, Row, params};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CRUD over one table of the local cache. Batch operations return the
/// number of rows affected.
pub trait Collection {
    type Item;

    fn list_all(&self) -> AppResult<Vec<Self::Item>>;
    fn insert_all(&self, items: &[Self::Item]) -> AppResult<usize>;
    fn update_all(&self, items: &[Self::Item]) -> AppResult<usize>;
    fn delete_all(&self, items: &[Self::Item]) -> AppResult<usize>;
}

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

fn id_list(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------
// Projects
// ---------------------------

pub struct ProjectStore<'c> {
    conn: &'c Connection,
}

impl<'c> ProjectStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

fn map_project(row: &Row) -> Result<Project> {
    let name: String = row.get("name")?;
    let mut project = Project::new(row.get("id")?, &name);
    project.description = row.get("description")?;
    Ok(project)
}

/// Rows carry no task ids; see [`load_catalogue`].
impl Collection for ProjectStore<'_> {
    type Item = Project;

    fn list_all(&self) -> AppResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM project ORDER BY id ASC")?;
        let rows = stmt.query_map([], map_project)?;
        Ok(rows.collect::<Result<Vec<_>>>()?)
    }

    fn insert_all(&self, items: &[Project]) -> AppResult<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO project (id, name, description) VALUES (?1, ?2, ?3)")?;
        let mut n = 0;
        for p in items {
            n += stmt.execute(params![p.id, p.name, p.description])?;
        }
        Ok(n)
    }

    fn update_all(&self, items: &[Project]) -> AppResult<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("UPDATE project SET name = ?2, description = ?3 WHERE id = ?1")?;
        let mut n = 0;
        for p in items {
            n += stmt.execute(params![p.id, p.name, p.description])?;
        }
        Ok(n)
    }

    fn delete_all(&self, items: &[Project]) -> AppResult<usize> {
        let mut stmt = self.conn.prepare_cached("DELETE FROM project WHERE id = ?1")?;
        let mut n = 0;
        for p in items {
            n += stmt.execute([p.id])?;
        }
        Ok(n)
    }
}

// ---------------------------
// Tasks
// ---------------------------

pub struct TaskStore<'c> {
    conn: &'c Connection,
}

impl<'c> TaskStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

fn map_task(row: &Row) -> Result<ProjectTask> {
    let name: String = row.get("name")?;
    let mut task = ProjectTask::new(row.get("id")?, &name);
    task.description = row.get("description")?;
    Ok(task)
}

impl Collection for TaskStore<'_> {
    type Item = ProjectTask;

    fn list_all(&self) -> AppResult<Vec<ProjectTask>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM project_task ORDER BY id ASC")?;
        let rows = stmt.query_map([], map_task)?;
        Ok(rows.collect::<Result<Vec<_>>>()?)
    }

    fn insert_all(&self, items: &[ProjectTask]) -> AppResult<usize> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO project_task (id, name, description) VALUES (?1, ?2, ?3)",
        )?;
        let mut n = 0;
        for t in items {
            n += stmt.execute(params![t.id, t.name, t.description])?;
        }
        Ok(n)
    }

    fn update_all(&self, items: &[ProjectTask]) -> AppResult<usize> {
        let mut stmt = self.conn.prepare_cached(
            "UPDATE project_task SET name = ?2, description = ?3 WHERE id = ?1",
        )?;
        let mut n = 0;
        for t in items {
            n += stmt.execute(params![t.id, t.name, t.description])?;
        }
        Ok(n)
    }

    fn delete_all(&self, items: &[ProjectTask]) -> AppResult<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("DELETE FROM project_task WHERE id = ?1")?;
        let mut n = 0;
        for t in items {
            n += stmt.execute([t.id])?;
        }
        Ok(n)
    }
}

// ---------------------------
// Project/task associations
// ---------------------------

pub struct KeyStore<'c> {
    conn: &'c Connection,
}

impl<'c> KeyStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn delete_by_projects(&self, project_ids: &[i64]) -> AppResult<usize> {
        if project_ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "DELETE FROM project_task_key WHERE project_id IN ({})",
            id_list(project_ids)
        );
        Ok(self.conn.execute(&sql, [])?)
    }

    pub fn delete_by_tasks(&self, task_ids: &[i64]) -> AppResult<usize> {
        if task_ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "DELETE FROM project_task_key WHERE task_id IN ({})",
            id_list(task_ids)
        );
        Ok(self.conn.execute(&sql, [])?)
    }
}

impl Collection for KeyStore<'_> {
    type Item = ProjectTaskKey;

    fn list_all(&self) -> AppResult<Vec<ProjectTaskKey>> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id, task_id FROM project_task_key ORDER BY project_id, task_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ProjectTaskKey::new(row.get(0)?, row.get(1)?))
        })?;
        Ok(rows.collect::<Result<Vec<_>>>()?)
    }

    fn insert_all(&self, items: &[ProjectTaskKey]) -> AppResult<usize> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO project_task_key (project_id, task_id) VALUES (?1, ?2)",
        )?;
        let mut n = 0;
        for k in items {
            n += stmt.execute([k.project_id, k.task_id])?;
        }
        Ok(n)
    }

    /// The pair is the whole row, so there is nothing to update.
    fn update_all(&self, _items: &[ProjectTaskKey]) -> AppResult<usize> {
        Ok(0)
    }

    fn delete_all(&self, items: &[ProjectTaskKey]) -> AppResult<usize> {
        let mut stmt = self.conn.prepare_cached(
            "DELETE FROM project_task_key WHERE project_id = ?1 AND task_id = ?2",
        )?;
        let mut n = 0;
        for k in items {
            n += stmt.execute([k.project_id, k.task_id])?;
        }
        Ok(n)
    }
}

/// Projects with their task ids, and all tasks.
pub fn load_catalogue(conn: &Connection) -> AppResult<Catalogue> {
    let mut projects = ProjectStore::new(conn).list_all()?;
    let tasks = TaskStore::new(conn).list_all()?;

    for key in KeyStore::new(conn).list_all()? {
        if let Some(project) = projects.iter_mut().find(|p| p.id == key.project_id) {
            project.task_ids.push(key.task_id);
        }
    }

    Ok(Catalogue::new(projects, tasks))
}

// ---------------------------
// Time records and the report cache
// ---------------------------

/// The two record tables share one layout.
#[derive(Debug, Clone, Copy)]
enum RecordTable {
    TimeRecord,
    Report,
}

impl RecordTable {
    fn name(&self) -> &'static str {
        match self {
            RecordTable::TimeRecord => "time_record",
            RecordTable::Report => "report",
        }
    }
}

const RECORD_COLUMNS: &str = "id, project_id, project_name, task_id, task_name, date, start, \
     finish, duration, note, cost, location, status, version";

fn format_timestamp(ts: Option<NaiveDateTime>) -> Option<String> {
    ts.map(|t| t.format(DATETIME_FORMAT).to_string())
}

fn parse_timestamp(text: Option<String>) -> Result<Option<NaiveDateTime>> {
    match text {
        None => Ok(None),
        Some(s) => NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT)
            .map(Some)
            .map_err(|_| conversion_error(AppError::InvalidTime(s.clone()))),
    }
}

pub fn map_record(row: &Row) -> Result<TimeRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .map_err(|_| conversion_error(AppError::InvalidDate(date_str.clone())))?;

    let status_str: String = row.get("status")?;
    let status = TaskRecordStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(AppError::InvalidStatus(status_str.clone())))?;

    Ok(TimeRecord {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        project_name: row.get("project_name")?,
        task_id: row.get("task_id")?,
        task_name: row.get("task_name")?,
        date,
        start: parse_timestamp(row.get("start")?)?,
        finish: parse_timestamp(row.get("finish")?)?,
        duration: row.get("duration")?,
        note: row.get("note")?,
        cost: row.get("cost")?,
        location: Location::from_id(row.get("location")?),
        status,
        version: row.get("version")?,
    })
}

fn select_records(
    conn: &Connection,
    table: RecordTable,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
) -> AppResult<Vec<TimeRecord>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM {} {filter} ORDER BY date ASC, start ASC, row_id ASC",
        table.name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(args, map_record)?;
    Ok(rows.collect::<Result<Vec<_>>>()?)
}

fn insert_records(conn: &Connection, table: RecordTable, items: &[TimeRecord]) -> AppResult<usize> {
    let sql = format!(
        "INSERT INTO {} ({RECORD_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        table.name()
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let mut n = 0;
    for r in items {
        n += stmt.execute(params![
            r.id,
            r.project_id,
            r.project_name,
            r.task_id,
            r.task_name,
            format_system_date(r.date),
            format_timestamp(r.start),
            format_timestamp(r.finish),
            r.duration,
            r.note,
            r.cost,
            r.location.id(),
            r.status.to_db_str(),
            r.version,
        ])?;
    }
    Ok(n)
}

/// Rows are addressed by server id; records without one are skipped.
fn update_records(conn: &Connection, table: RecordTable, items: &[TimeRecord]) -> AppResult<usize> {
    let sql = format!(
        "UPDATE {} SET
            project_id = ?2, project_name = ?3, task_id = ?4, task_name = ?5,
            date = ?6, start = ?7, finish = ?8, duration = ?9, note = ?10,
            cost = ?11, location = ?12, status = ?13, version = ?14
         WHERE id = ?1",
        table.name()
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let mut n = 0;
    for r in items.iter().filter(|r| r.has_identity()) {
        n += stmt.execute(params![
            r.id,
            r.project_id,
            r.project_name,
            r.task_id,
            r.task_name,
            format_system_date(r.date),
            format_timestamp(r.start),
            format_timestamp(r.finish),
            r.duration,
            r.note,
            r.cost,
            r.location.id(),
            r.status.to_db_str(),
            r.version,
        ])?;
    }
    Ok(n)
}

fn delete_records(conn: &Connection, table: RecordTable, items: &[TimeRecord]) -> AppResult<usize> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", table.name());
    let mut stmt = conn.prepare_cached(&sql)?;
    let mut n = 0;
    for r in items.iter().filter(|r| r.has_identity()) {
        n += stmt.execute([r.id])?;
    }
    Ok(n)
}

fn delete_records_by(conn: &Connection, table: RecordTable, column: &str, ids: &[i64]) -> AppResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM {} WHERE {column} IN ({})",
        table.name(),
        id_list(ids)
    );
    Ok(conn.execute(&sql, [])?)
}

fn between_args(start: NaiveDate, end: NaiveDate) -> (String, String) {
    (format_system_date(start), format_system_date(end))
}

/// Cached time records, including local drafts without a server id.
pub struct RecordStore<'c> {
    conn: &'c Connection,
}

impl<'c> RecordStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Records dated within `start..=end`.
    pub fn list_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<TimeRecord>> {
        let (s, e) = between_args(start, end);
        select_records(
            self.conn,
            RecordTable::TimeRecord,
            "WHERE date BETWEEN ?1 AND ?2",
            &[&s, &e],
        )
    }

    pub fn find(&self, id: i64) -> AppResult<Option<TimeRecord>> {
        if id == ID_NONE {
            return Ok(None);
        }
        let found = select_records(self.conn, RecordTable::TimeRecord, "WHERE id = ?1", &[&id])?;
        Ok(found.into_iter().next())
    }

    pub fn delete_by_projects(&self, project_ids: &[i64]) -> AppResult<usize> {
        delete_records_by(self.conn, RecordTable::TimeRecord, "project_id", project_ids)
    }

    pub fn delete_by_tasks(&self, task_ids: &[i64]) -> AppResult<usize> {
        delete_records_by(self.conn, RecordTable::TimeRecord, "task_id", task_ids)
    }
}

impl Collection for RecordStore<'_> {
    type Item = TimeRecord;

    fn list_all(&self) -> AppResult<Vec<TimeRecord>> {
        select_records(self.conn, RecordTable::TimeRecord, "", &[])
    }

    fn insert_all(&self, items: &[TimeRecord]) -> AppResult<usize> {
        insert_records(self.conn, RecordTable::TimeRecord, items)
    }

    fn update_all(&self, items: &[TimeRecord]) -> AppResult<usize> {
        update_records(self.conn, RecordTable::TimeRecord, items)
    }

    fn delete_all(&self, items: &[TimeRecord]) -> AppResult<usize> {
        delete_records(self.conn, RecordTable::TimeRecord, items)
    }
}

/// Rows of generated reports, cached per date range.
pub struct ReportStore<'c> {
    conn: &'c Connection,
}

impl<'c> ReportStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn list_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<TimeRecord>> {
        let (s, e) = between_args(start, end);
        select_records(
            self.conn,
            RecordTable::Report,
            "WHERE date BETWEEN ?1 AND ?2",
            &[&s, &e],
        )
    }

    /// Drop the rows in range that carry no server id; they cannot be
    /// matched and are rebuilt from every report.
    pub fn delete_unidentified_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<usize> {
        let (s, e) = between_args(start, end);
        Ok(self.conn.execute(
            "DELETE FROM report WHERE id = 0 AND date BETWEEN ?1 AND ?2",
            params![s, e],
        )?)
    }

    pub fn delete_by_projects(&self, project_ids: &[i64]) -> AppResult<usize> {
        delete_records_by(self.conn, RecordTable::Report, "project_id", project_ids)
    }

    pub fn delete_by_tasks(&self, task_ids: &[i64]) -> AppResult<usize> {
        delete_records_by(self.conn, RecordTable::Report, "task_id", task_ids)
    }
}

impl Collection for ReportStore<'_> {
    type Item = TimeRecord;

    fn list_all(&self) -> AppResult<Vec<TimeRecord>> {
        select_records(self.conn, RecordTable::Report, "", &[])
    }

    fn insert_all(&self, items: &[TimeRecord]) -> AppResult<usize> {
        insert_records(self.conn, RecordTable::Report, items)
    }

    fn update_all(&self, items: &[TimeRecord]) -> AppResult<usize> {
        update_records(self.conn, RecordTable::Report, items)
    }

    fn delete_all(&self, items: &[TimeRecord]) -> AppResult<usize> {
        delete_records(self.conn, RecordTable::Report, items)
    }
}

// ---------------------------
// Internal log
// ---------------------------

#[derive(Debug, Clone)]
pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub fn load_log(conn: &Connection) -> AppResult<Vec<LogRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, operation, IFNULL(target, ''), message FROM log ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(LogRow {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get(3)?,
            message: row.get(4)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>>>()?)
}
