//! Reconciliation of scraped pages into the local cache.
//!
//! [`reconcile`] is the pure half: it compares a remote snapshot with the
//! cached rows by identity and says what to insert, update and delete.
//! [`saver`] applies those changes page by page inside one transaction.

pub mod saver;

use crate::models::{Project, ProjectTask, ProjectTaskKey, TimeRecord};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub use saver::save_page;

/// An entity with a stable identity across the server and the cache.
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
}

impl Keyed for Project {
    type Key = i64;
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for ProjectTask {
    type Key = i64;
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for ProjectTaskKey {
    type Key = ProjectTaskKey;
    fn key(&self) -> ProjectTaskKey {
        *self
    }
}

impl Keyed for TimeRecord {
    type Key = i64;
    fn key(&self) -> i64 {
        self.id
    }
}

/// What one collection needs to look like the remote snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Changes<T> {
    pub insert: Vec<T>,
    pub update: Vec<T>,
    pub delete: Vec<T>,
}

impl<T> Default for Changes<T> {
    fn default() -> Self {
        Self {
            insert: Vec::new(),
            update: Vec::new(),
            delete: Vec::new(),
        }
    }
}

impl<T> Changes<T> {
    pub fn is_empty(&self) -> bool {
        self.insert.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// Merge strategy that takes the remote copy as is.
pub fn replace<T: Clone>(_local: &T, remote: &T) -> T {
    remote.clone()
}

/// Merge strategy for records: only the fields a page carries are copied
/// onto the cached record.
pub fn merge_record(local: &TimeRecord, remote: &TimeRecord) -> TimeRecord {
    let mut merged = local.clone();
    merged.merge_remote(remote);
    merged
}

/// Merge strategy for rows of a report showing the Cost column: the cost
/// is taken as well, zero included.
pub fn merge_report_row(local: &TimeRecord, remote: &TimeRecord) -> TimeRecord {
    let mut merged = merge_record(local, remote);
    merged.cost = remote.cost;
    merged
}

/// Compare `remote` with `local` by key.
///
/// Remote items unknown locally are inserted. Known ones are merged onto the
/// local copy with `merge` and listed for update only when the merge
/// changes something. Local items missing from `remote` are deleted. A key
/// repeated in `remote` is taken once, first occurrence wins.
pub fn reconcile<T, F>(remote: &[T], local: &[T], merge: F) -> Changes<T>
where
    T: Keyed + Clone + PartialEq,
    F: Fn(&T, &T) -> T,
{
    let local_by_key: HashMap<T::Key, &T> = local.iter().map(|l| (l.key(), l)).collect();
    let mut seen: HashSet<T::Key> = HashSet::new();
    let mut changes = Changes::default();

    for item in remote {
        let key = item.key();
        if !seen.insert(key.clone()) {
            continue;
        }
        match local_by_key.get(&key) {
            Some(cached) => {
                let merged = merge(cached, item);
                if merged != **cached {
                    changes.update.push(merged);
                }
            }
            None => changes.insert.push(item.clone()),
        }
    }

    changes.delete = local
        .iter()
        .filter(|l| !seen.contains(&l.key()))
        .cloned()
        .collect();

    changes
}

/// Rows touched in one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }

    fn summary(&self, label: &str) -> Option<String> {
        if self.total() == 0 {
            return None;
        }
        Some(format!(
            "{label} +{} ~{} -{}",
            self.inserted, self.updated, self.deleted
        ))
    }
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub projects: Counts,
    pub tasks: Counts,
    pub keys: Counts,
    pub records: Counts,
    pub report: Counts,
    /// Dependent rows removed because their project or task went away.
    pub cascaded: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.projects.total()
            + self.tasks.total()
            + self.keys.total()
            + self.records.total()
            + self.report.total()
            + self.cascaded
            == 0
    }

    /// One line suitable for the audit log.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = [
            self.projects.summary("projects"),
            self.tasks.summary("tasks"),
            self.keys.summary("links"),
            self.records.summary("records"),
            self.report.summary("report"),
        ]
        .into_iter()
        .flatten()
        .collect();

        if self.cascaded > 0 {
            parts.push(format!("cascaded -{}", self.cascaded));
        }
        if parts.is_empty() {
            return "no changes".to_string();
        }
        parts.join(", ")
    }
}
