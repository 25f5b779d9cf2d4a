use rusqlite::Connection;
use worktracker::db::initialize::init_db;
use worktracker::db::queries::{
    Collection, KeyStore, ProjectStore, RecordStore, ReportStore, TaskStore, load_log,
};
use worktracker::errors::AppError;
use worktracker::models::{
    Catalogue, Location, Page, Project, ProjectTask, ProjectTaskKey, TaskRecordStatus,
    TimeListPage, TimeRecord, TimeTotals,
};
use worktracker::parser::{PageKind, parse_page};
use worktracker::sync::{Counts, merge_record, merge_report_row, reconcile, replace, save_page};

mod common;
use common::{context, date, fixture, memory_db};

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).expect("count query")
}

fn record(id: i64, day: &str, project_id: i64, task_id: i64) -> TimeRecord {
    let mut r = TimeRecord::new(date(day));
    r.id = id;
    r.project_id = project_id;
    r.task_id = task_id;
    r.duration = 3_600_000;
    r.status = TaskRecordStatus::Current;
    r
}

fn project(id: i64, name: &str, task_ids: &[i64]) -> Project {
    let mut p = Project::new(id, name);
    p.task_ids = task_ids.to_vec();
    p
}

fn time_list(day: &str, projects: Vec<Project>, tasks: Vec<ProjectTask>, records: Vec<TimeRecord>) -> Page {
    Page::TimeList(TimeListPage {
        date: date(day),
        records,
        catalogue: Catalogue::new(projects, tasks),
        associations_known: true,
        totals: TimeTotals::default(),
        error_message: None,
    })
}

/// Projects Alpha (1) and Beta (2) sharing task 10, with dependents of both.
fn seed(conn: &Connection) {
    ProjectStore::new(conn)
        .insert_all(&[Project::new(1, "Alpha"), Project::new(2, "Beta")])
        .expect("projects");
    TaskStore::new(conn)
        .insert_all(&[ProjectTask::new(10, "Design")])
        .expect("tasks");
    KeyStore::new(conn)
        .insert_all(&[ProjectTaskKey::new(1, 10), ProjectTaskKey::new(2, 10)])
        .expect("keys");
    RecordStore::new(conn)
        .insert_all(&[
            record(201, "2024-03-04", 1, 10),
            record(301, "2024-03-05", 2, 10),
        ])
        .expect("records");
    ReportStore::new(conn)
        .insert_all(&[record(301, "2024-03-05", 2, 10)])
        .expect("report rows");
}

#[test]
fn test_reconcile_partitions_by_identity() {
    let local = vec![Project::new(1, "Alpha"), Project::new(2, "Beta")];
    let remote = vec![Project::new(1, "Alpha"), Project::new(3, "Gamma")];

    let changes = reconcile(&remote, &local, replace);
    assert_eq!(changes.insert, vec![Project::new(3, "Gamma")]);
    assert!(changes.update.is_empty());
    assert_eq!(changes.delete, vec![Project::new(2, "Beta")]);

    let renamed = vec![Project::new(1, "Alpha 2")];
    let changes = reconcile(&renamed, &local, replace);
    assert_eq!(changes.update, vec![Project::new(1, "Alpha 2")]);
    assert_eq!(changes.delete.len(), 1);
}

#[test]
fn test_reconcile_takes_repeated_keys_once() {
    let remote = vec![ProjectTaskKey::new(1, 10), ProjectTaskKey::new(1, 10)];
    let changes = reconcile(&remote, &[], replace);
    assert_eq!(changes.insert, vec![ProjectTaskKey::new(1, 10)]);
}

#[test]
fn test_merge_record_keeps_local_bookkeeping() {
    let mut local = record(101, "2024-03-01", 1, 10);
    local.version = 7;
    local.location = Location::Home;
    local.cost = 12.0;

    let mut remote = record(101, "2024-03-01", 1, 11);
    remote.note = "changed".to_string();

    let merged = merge_record(&local, &remote);
    assert_eq!(merged.version, 7);
    assert_eq!(merged.location, Location::Home);
    assert_eq!(merged.cost, 12.0);
    assert_eq!(merged.task_id, 11);
    assert_eq!(merged.note, "changed");

    // Pages without a Cost column never touch the cached cost.
    remote.cost = 5.0;
    assert_eq!(merge_record(&local, &remote).cost, 12.0);
}

#[test]
fn test_report_row_merge_takes_zero_cost() {
    let mut local = record(101, "2024-03-01", 1, 10);
    local.cost = 300.0;
    local.version = 2;
    let remote = record(101, "2024-03-01", 1, 10);

    let merged = merge_report_row(&local, &remote);
    assert_eq!(merged.cost, 0.0);
    assert_eq!(merged.version, 2);
}

#[test]
fn test_project_removal_cascades() {
    let mut conn = memory_db();
    seed(&conn);

    let page = time_list(
        "2024-03-01",
        vec![project(1, "Alpha", &[10]), project(3, "Gamma", &[10])],
        vec![ProjectTask::new(10, "Design")],
        Vec::new(),
    );
    let report = save_page(&mut conn, &page).expect("sync");

    assert_eq!(
        report.projects,
        Counts {
            inserted: 1,
            updated: 0,
            deleted: 1
        }
    );
    assert_eq!(report.cascaded, 3);
    assert_eq!(report.keys.inserted, 1);

    let ids: Vec<i64> = ProjectStore::new(&conn)
        .list_all()
        .expect("projects")
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, [1, 3]);

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project_task_key WHERE project_id = 2"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM time_record WHERE project_id = 2"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM report WHERE project_id = 2"), 0);

    // Other days' records of surviving projects are untouched.
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM time_record WHERE id = 201"), 1);
}

#[test]
fn test_task_removal_cascades() {
    let mut conn = memory_db();
    seed(&conn);

    let page = time_list(
        "2024-03-01",
        vec![project(1, "Alpha", &[11]), project(2, "Beta", &[11])],
        vec![ProjectTask::new(11, "Build")],
        Vec::new(),
    );
    let report = save_page(&mut conn, &page).expect("sync");

    assert_eq!(report.tasks.deleted, 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project_task_key WHERE task_id = 10"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM time_record WHERE task_id = 10"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM report WHERE task_id = 10"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project_task_key"), 2);
}

#[test]
fn test_failed_pass_leaves_store_unchanged() {
    let mut conn = memory_db();
    seed(&conn);
    conn.execute_batch(
        "CREATE TRIGGER reject_project BEFORE INSERT ON project
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .expect("trigger");

    let page = time_list(
        "2024-03-01",
        vec![project(1, "Alpha", &[10]), project(3, "Gamma", &[10])],
        vec![ProjectTask::new(10, "Design")],
        Vec::new(),
    );
    let err = save_page(&mut conn, &page).expect_err("insert is rejected");
    assert!(matches!(err, AppError::Db(_)));

    // The cascade and the delete that ran before the failure are undone.
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project WHERE id = 2"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project_task_key WHERE project_id = 2"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM time_record WHERE id = 301"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM report WHERE project_id = 2"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM log WHERE operation = 'sync'"), 0);
}

#[test]
fn test_time_list_sync_is_idempotent() {
    let mut conn = memory_db();
    let page = parse_page(PageKind::TimeList, &fixture("time_list.html"), &context("2024-03-01"));

    let first = save_page(&mut conn, &page).expect("first pass");
    assert_eq!(first.projects.inserted, 2);
    assert_eq!(first.tasks.inserted, 2);
    assert_eq!(first.keys.inserted, 3);
    assert_eq!(first.records.inserted, 2);

    let second = save_page(&mut conn, &page).expect("second pass");
    assert!(second.is_noop(), "unexpected changes: {}", second.summary());

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM time_record"), 2);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project"), 2);

    let log = load_log(&conn).expect("log");
    let passes: Vec<_> = log.iter().filter(|l| l.operation == "sync").collect();
    assert_eq!(passes.len(), 2);
    assert_eq!(passes[0].target, "time-list");
    assert_eq!(passes[1].message, "no changes");
}

#[test]
fn test_day_sync_does_not_touch_other_days() {
    let mut conn = memory_db();
    let mut draft = record(0, "2024-03-01", 1, 10);
    draft.status = TaskRecordStatus::Draft;
    RecordStore::new(&conn)
        .insert_all(&[
            record(500, "2024-03-02", 1, 10),
            record(103, "2024-03-01", 1, 10),
            draft,
        ])
        .expect("records");

    let page = parse_page(PageKind::TimeList, &fixture("time_list.html"), &context("2024-03-01"));
    let report = save_page(&mut conn, &page).expect("sync");

    assert_eq!(report.records.deleted, 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM time_record WHERE id = 500"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM time_record WHERE id = 103"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM time_record WHERE id = 0"), 1);
}

#[test]
fn test_matched_record_keeps_version() {
    let mut conn = memory_db();
    let mut cached = record(101, "2024-03-01", 1, 10);
    cached.version = 7;
    cached.location = Location::Home;
    cached.cost = 12.0;
    cached.note = "old".to_string();
    RecordStore::new(&conn).insert_all(&[cached]).expect("record");

    let page = parse_page(PageKind::TimeList, &fixture("time_list.html"), &context("2024-03-01"));
    let report = save_page(&mut conn, &page).expect("sync");
    assert_eq!(report.records.updated, 1);
    assert_eq!(report.records.inserted, 1);

    let stored = RecordStore::new(&conn)
        .find(101)
        .expect("query")
        .expect("record 101");
    assert_eq!(stored.version, 7);
    assert_eq!(stored.location, Location::Home);
    assert_eq!(stored.cost, 12.0);
    assert_eq!(stored.note, "Kickoff\nnotes");
    assert_eq!(stored.elapsed(), 9_000_000);
}

#[test]
fn test_missing_script_keeps_cached_links() {
    let mut conn = memory_db();
    KeyStore::new(&conn)
        .insert_all(&[ProjectTaskKey::new(1, 10), ProjectTaskKey::new(2, 10)])
        .expect("keys");

    let html = fixture("time_list.html").replace("var task_ids = new Array();", "");
    let page = parse_page(PageKind::TimeList, &html, &context("2024-03-01"));
    let report = save_page(&mut conn, &page).expect("sync");

    assert_eq!(report.keys.total(), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project_task_key"), 2);
}

#[test]
fn test_edit_page_upserts_one_record() {
    let mut conn = memory_db();

    let edit = parse_page(PageKind::TimeEdit, &fixture("time_edit.html"), &context("2024-03-01"));
    let report = save_page(&mut conn, &edit).expect("edit sync");
    assert_eq!(report.records.inserted, 1);

    let stored = RecordStore::new(&conn).find(101).expect("query").expect("record");
    assert_eq!(stored.location, Location::Office);
    assert_eq!(stored.elapsed(), 3 * 3_600_000);

    let list = parse_page(PageKind::TimeList, &fixture("time_list.html"), &context("2024-03-01"));
    let report = save_page(&mut conn, &list).expect("list sync");
    assert_eq!(report.records.updated, 1);
    assert_eq!(report.records.inserted, 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM time_record"), 2);

    // The list page has no location column; the edited value survives.
    let stored = RecordStore::new(&conn).find(101).expect("query").expect("record");
    assert_eq!(stored.location, Location::Office);
}

#[test]
fn test_report_cache_within_range() {
    let mut conn = memory_db();
    ReportStore::new(&conn)
        .insert_all(&[
            record(900, "2024-02-20", 1, 10),
            record(901, "2024-03-15", 1, 10),
        ])
        .expect("report rows");

    let mut ctx = context("2024-03-10");
    ctx.filter.start = Some(date("2024-03-01"));
    ctx.filter.finish = Some(date("2024-03-31"));

    let page = parse_page(PageKind::Report, &fixture("report.html"), &ctx);
    let report = save_page(&mut conn, &page).expect("report sync");
    assert_eq!(report.report.inserted, 2);
    assert_eq!(report.report.deleted, 1);

    // Rows outside the report's range stay cached.
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM report WHERE id = 900"), 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM report"), 3);

    let again = save_page(&mut conn, &page).expect("second pass");
    assert!(again.is_noop(), "unexpected changes: {}", again.summary());

    let Page::Report(mut shorter) = page else {
        panic!("report page expected");
    };
    shorter.records.retain(|r| r.id != 101);
    let report = save_page(&mut conn, &Page::Report(shorter)).expect("third pass");
    assert_eq!(report.report.deleted, 1);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM report WHERE id = 101"), 0);
}

#[test]
fn test_listing_pages_change_nothing() {
    let mut conn = memory_db();
    seed(&conn);

    let page = parse_page(PageKind::Projects, &fixture("projects.html"), &context("2024-03-01"));
    let report = save_page(&mut conn, &page).expect("sync");

    assert!(report.is_noop());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM project"), 2);
}

fn cached_cost(conn: &Connection, id: i64) -> f64 {
    conn.query_row("SELECT cost FROM report WHERE id = ?1", [id], |row| row.get(0))
        .expect("cached report row")
}

#[test]
fn test_report_cost_follows_cost_column() {
    let mut conn = memory_db();
    let mut cached = record(101, "2024-03-01", 1, 10);
    cached.cost = 300.0;
    ReportStore::new(&conn).insert_all(&[cached]).expect("report row");

    let mut ctx = context("2024-03-10");
    ctx.filter.start = Some(date("2024-03-01"));
    ctx.filter.finish = Some(date("2024-03-31"));
    let Page::Report(mut page) = parse_page(PageKind::Report, &fixture("report.html"), &ctx) else {
        panic!("report page expected");
    };

    save_page(&mut conn, &Page::Report(page.clone())).expect("first pass");
    assert_eq!(cached_cost(&conn, 101), 125.5);

    // A cost that really dropped to zero is stored.
    for r in page.records.iter_mut() {
        r.cost = 0.0;
    }
    let report = save_page(&mut conn, &Page::Report(page.clone())).expect("zero cost");
    assert_eq!(report.report.updated, 1);
    assert_eq!(cached_cost(&conn, 101), 0.0);

    // Without the column the cached value stays.
    page.cost_shown = false;
    for r in page.records.iter_mut() {
        r.cost = 999.0;
    }
    save_page(&mut conn, &Page::Report(page)).expect("no cost column");
    assert_eq!(cached_cost(&conn, 101), 0.0);
}

#[test]
fn test_incompatible_schema_is_migration_error() {
    let conn = Connection::open_in_memory().expect("in-memory database");
    conn.execute_batch("CREATE TABLE time_record (note TEXT);")
        .expect("legacy table");

    let err = init_db(&conn).expect_err("index on a missing column");
    assert!(matches!(err, AppError::Migration(_)));
}
