use super::{Changes, Counts, SyncReport, merge_record, merge_report_row, reconcile, replace};
use crate::db::log::ttlog;
use crate::db::queries::{
    Collection, KeyStore, ProjectStore, RecordStore, ReportStore, TaskStore,
};
use crate::errors::AppResult;
use crate::models::{Catalogue, Page, Project, ReportPage, TimeRecord};
use chrono::NaiveDate;
use rusqlite::{Connection, TransactionBehavior};

/// Bring the local cache into agreement with `page`.
///
/// The whole pass runs in one immediate transaction: the write lock is taken
/// up front, so two passes never interleave, and any failure rolls every
/// change back, cascades included. The pass is recorded in `log` on commit.
pub fn save_page(conn: &mut Connection, page: &Page) -> AppResult<SyncReport> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let report = apply_page(&tx, page)?;
    ttlog(&tx, "sync", page_target(page), &report.summary())?;

    tx.commit()?;
    log::info!("sync {}: {}", page_target(page), report.summary());
    Ok(report)
}

fn page_target(page: &Page) -> &'static str {
    match page {
        Page::TimeList(_) => "time-list",
        Page::TimeEdit(_) => "time-edit",
        Page::ReportForm(_) => "report-form",
        Page::Report(_) => "report",
        Page::Projects(_) => "projects",
        Page::Tasks(_) => "tasks",
        Page::Users(_) => "users",
    }
}

fn apply_page(conn: &Connection, page: &Page) -> AppResult<SyncReport> {
    let mut report = SyncReport::default();

    match page {
        Page::TimeList(p) => {
            save_catalogue(conn, &p.catalogue, p.associations_known, &mut report)?;
            report.records = save_day_records(conn, p.date, &p.records)?;
        }
        Page::TimeEdit(p) => {
            save_catalogue(conn, &p.catalogue, p.associations_known, &mut report)?;
            report.records = save_edited_record(conn, &p.record)?;
        }
        Page::ReportForm(p) => {
            save_catalogue(conn, &p.catalogue, p.associations_known, &mut report)?;
        }
        Page::Report(p) => {
            report.report = save_report_rows(conn, p)?;
        }
        Page::Projects(_) | Page::Tasks(_) | Page::Users(_) => {
            log::debug!("{} pages carry no ids, nothing to reconcile", page_target(page));
        }
    }

    Ok(report)
}

/// Deletes, then inserts, then updates.
fn apply<C: Collection>(store: &C, changes: &Changes<C::Item>) -> AppResult<Counts> {
    let deleted = store.delete_all(&changes.delete)?;
    let inserted = store.insert_all(&changes.insert)?;
    let updated = store.update_all(&changes.update)?;
    Ok(Counts {
        inserted,
        updated,
        deleted,
    })
}

fn cascade_projects(conn: &Connection, project_ids: &[i64]) -> AppResult<usize> {
    Ok(KeyStore::new(conn).delete_by_projects(project_ids)?
        + RecordStore::new(conn).delete_by_projects(project_ids)?
        + ReportStore::new(conn).delete_by_projects(project_ids)?)
}

fn cascade_tasks(conn: &Connection, task_ids: &[i64]) -> AppResult<usize> {
    Ok(KeyStore::new(conn).delete_by_tasks(task_ids)?
        + RecordStore::new(conn).delete_by_tasks(task_ids)?
        + ReportStore::new(conn).delete_by_tasks(task_ids)?)
}

/// Projects, tasks and, when the page's script was found, their links.
///
/// A page without any identified project or task (form missing, server
/// error) leaves the cached catalogue alone.
fn save_catalogue(
    conn: &Connection,
    catalogue: &Catalogue,
    associations_known: bool,
    report: &mut SyncReport,
) -> AppResult<()> {
    let (projects, tasks) = catalogue.identified();
    if projects.is_empty() && tasks.is_empty() {
        log::warn!("page has no catalogue, cached projects and tasks kept");
        return Ok(());
    }

    // Rows hold no task ids; links are reconciled separately.
    let projects: Vec<Project> = projects
        .into_iter()
        .map(|p| Project {
            task_ids: Vec::new(),
            ..p
        })
        .collect();

    let store = ProjectStore::new(conn);
    let changes = reconcile(&projects, &store.list_all()?, replace);
    let gone: Vec<i64> = changes.delete.iter().map(|p| p.id).collect();
    report.cascaded += cascade_projects(conn, &gone)?;
    report.projects = apply(&store, &changes)?;

    let store = TaskStore::new(conn);
    let changes = reconcile(&tasks, &store.list_all()?, replace);
    let gone: Vec<i64> = changes.delete.iter().map(|t| t.id).collect();
    report.cascaded += cascade_tasks(conn, &gone)?;
    report.tasks = apply(&store, &changes)?;

    if associations_known {
        let store = KeyStore::new(conn);
        let changes = reconcile(&catalogue.keys(), &store.list_all()?, replace);
        report.keys = apply(&store, &changes)?;
    } else {
        log::debug!("project/task links unknown on this page, cached links kept");
    }

    Ok(())
}

/// Remote records that already exist in the cache under another date are
/// moved rather than inserted; empty ones are never stored.
fn settle_inserts(store: &RecordStore, changes: &mut Changes<TimeRecord>) -> AppResult<()> {
    let mut insert = Vec::new();
    for remote in changes.insert.drain(..) {
        match store.find(remote.id)? {
            Some(cached) => {
                let merged = merge_record(&cached, &remote);
                if merged != cached {
                    changes.update.push(merged);
                }
            }
            None if remote.is_empty() => {
                log::debug!("record {} has no project, task or time, skipped", remote.id);
            }
            None => insert.push(remote),
        }
    }
    changes.insert = insert;
    Ok(())
}

/// Records of one day. Only that day's cached records may be deleted, and
/// local drafts without a server id are never touched.
fn save_day_records(conn: &Connection, date: NaiveDate, records: &[TimeRecord]) -> AppResult<Counts> {
    let store = RecordStore::new(conn);

    let cached: Vec<TimeRecord> = store
        .list_between(date, date)?
        .into_iter()
        .filter(TimeRecord::has_identity)
        .collect();
    let remote: Vec<TimeRecord> = records
        .iter()
        .filter(|r| r.has_identity())
        .cloned()
        .collect();

    let mut changes = reconcile(&remote, &cached, merge_record);
    settle_inserts(&store, &mut changes)?;
    apply(&store, &changes)
}

/// The editor shows a single record, so nothing can be inferred as deleted.
fn save_edited_record(conn: &Connection, record: &TimeRecord) -> AppResult<Counts> {
    if !record.has_identity() {
        log::debug!("edited record is not saved on the server yet, nothing to cache");
        return Ok(Counts::default());
    }

    let store = RecordStore::new(conn);
    let cached: Vec<TimeRecord> = store.find(record.id)?.into_iter().collect();

    let mut changes = reconcile(std::slice::from_ref(record), &cached, merge_record);
    changes.delete.clear();
    settle_inserts(&store, &mut changes)?;
    apply(&store, &changes)
}

/// Dates a report covers: the filter bounds, else the span of its rows.
pub fn report_range(page: &ReportPage) -> Option<(NaiveDate, NaiveDate)> {
    if let (Some(start), Some(finish)) = (page.filter.start, page.filter.finish) {
        return Some((start.min(finish), start.max(finish)));
    }
    let first = page.records.iter().map(|r| r.date).min()?;
    let last = page.records.iter().map(|r| r.date).max()?;
    Some((first, last))
}

/// Replace the cached report rows within the report's date range. Rows with
/// a server id are reconciled by id; rows without one are swapped as a
/// block when they differ from the cached block.
fn save_report_rows(conn: &Connection, page: &ReportPage) -> AppResult<Counts> {
    let Some((start, end)) = report_range(page) else {
        log::debug!("report has no date range, cache kept");
        return Ok(Counts::default());
    };
    let store = ReportStore::new(conn);

    let (cached, cached_anonymous): (Vec<TimeRecord>, Vec<TimeRecord>) = store
        .list_between(start, end)?
        .into_iter()
        .partition(TimeRecord::has_identity);
    let (remote, mut remote_anonymous): (Vec<TimeRecord>, Vec<TimeRecord>) = page
        .records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .cloned()
        .partition(TimeRecord::has_identity);
    // Same order the cache lists them in.
    remote_anonymous.sort_by_key(|r| (r.date, r.start));

    let merge: fn(&TimeRecord, &TimeRecord) -> TimeRecord = if page.cost_shown {
        merge_report_row
    } else {
        merge_record
    };
    let changes = reconcile(&remote, &cached, merge);
    let mut counts = apply(&store, &changes)?;

    if cached_anonymous != remote_anonymous {
        counts.deleted += store.delete_unidentified_between(start, end)?;
        counts.inserted += store.insert_all(&remote_anonymous)?;
    }

    Ok(counts)
}
