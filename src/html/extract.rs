//! Turning table rows into typed fields.
//!
//! A table's header row is scanned once into a [`ColumnIndex`]; every data
//! row is then read through it. Columns the server left out are simply
//! absent and their fields keep their defaults. A malformed value never
//! aborts the row: it degrades to `None`, zero or `ID_NONE`.

use super::locator::{cells, has_class, is_element, own_text, select_first, text_br};
use crate::models::ID_NONE;
use crate::utils::time::{parse_duration, parse_system_date, parse_system_time};
use chrono::{NaiveDate, NaiveDateTime};
use scraper::ElementRef;
use std::collections::HashMap;
use url::Url;

pub const COL_DATE: &str = "Date";
pub const COL_PROJECT: &str = "Project";
pub const COL_TASK: &str = "Task";
pub const COL_START: &str = "Start";
pub const COL_FINISH: &str = "Finish";
pub const COL_DURATION: &str = "Duration";
pub const COL_NOTE: &str = "Note";
pub const COL_COST: &str = "Cost";

/// Labels the record tables may carry.
pub const RECORD_COLUMNS: [&str; 8] = [
    COL_DATE,
    COL_PROJECT,
    COL_TASK,
    COL_START,
    COL_FINISH,
    COL_DURATION,
    COL_NOTE,
    COL_COST,
];

/// Position of each known label in a table's header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Scan `header` for the `known` labels. Unknown labels are ignored.
    pub fn from_header(header: ElementRef, known: &[&str]) -> Self {
        let header_cells = cells(header);
        let mut positions = HashMap::new();
        for (col, cell) in header_cells.iter().enumerate() {
            let label = own_text(*cell);
            if known.contains(&label.as_str()) {
                positions.entry(label).or_insert(col);
            }
        }
        Self { positions }
    }

    /// Column of `label`, `None` when the header does not carry it.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }
}

/// Where record edit links must point for their `id` to be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub base: Url,
    pub page: String,
}

impl EditTarget {
    pub fn new(base: Url, page: &str) -> Self {
        Self {
            base,
            page: page.to_string(),
        }
    }
}

/// The typed content of one data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFields {
    pub date: Option<NaiveDate>,
    pub project: Option<String>,
    pub task: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    pub duration: Option<i64>,
    pub note: Option<String>,
    pub cost: f64,
    pub id: i64,
}

/// A header or decoration row: its first cell is a header cell.
pub fn is_header_row(row: ElementRef) -> bool {
    match cells(row).first() {
        Some(first) => is_element(*first, "th") || has_class(*first, "tableHeader"),
        None => true,
    }
}

/// Blank means zero; anything else must be a decimal number.
pub fn parse_cost(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.replace(',', "").parse::<f64>().unwrap_or(0.0)
}

/// Server id carried in the `id` query parameter of an edit link.
///
/// The link is resolved against the target's base address; it must point at
/// the editor page, otherwise (or when unparseable) the result is `ID_NONE`.
pub fn parse_edit_id(href: &str, target: &EditTarget) -> i64 {
    let Ok(url) = target.base.join(href.trim()) else {
        return ID_NONE;
    };

    let page = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    if page != target.page {
        return ID_NONE;
    }

    url.query_pairs()
        .find(|(key, _)| key == "id")
        .and_then(|(_, value)| value.parse::<i64>().ok())
        .unwrap_or(ID_NONE)
}

/// The `href` of the first link inside `cell`.
pub fn link_href(cell: ElementRef) -> Option<String> {
    select_first(cell, "a[href]")
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// Read one data row through `columns`.
///
/// Header rows yield `None`. The row's date comes from the Date column when
/// present, else from `day`; times are read on that date. The edit link is
/// looked for in the last cell.
pub fn extract_row(
    row: ElementRef,
    columns: &ColumnIndex,
    day: Option<NaiveDate>,
    target: &EditTarget,
) -> Option<RowFields> {
    if is_header_row(row) {
        return None;
    }
    let row_cells = cells(row);
    let cell = |label: &str| columns.get(label).and_then(|i| row_cells.get(i).copied());
    let own = |label: &str| cell(label).map(own_text);

    let mut fields = RowFields {
        date: own(COL_DATE).and_then(|t| parse_system_date(&t)).or(day),
        project: own(COL_PROJECT),
        task: own(COL_TASK),
        note: cell(COL_NOTE).map(text_br),
        cost: own(COL_COST).map(|t| parse_cost(&t)).unwrap_or(0.0),
        duration: own(COL_DURATION).and_then(|t| parse_duration(&t)),
        id: ID_NONE,
        ..RowFields::default()
    };

    if let Some(date) = fields.date {
        fields.start = own(COL_START).and_then(|t| parse_system_time(date, &t));
        fields.finish = own(COL_FINISH).and_then(|t| parse_system_time(date, &t));
    }

    if let Some(last) = row_cells.last() {
        fields.id = link_href(*last)
            .map(|href| parse_edit_id(&href, target))
            .unwrap_or(ID_NONE);
    }

    Some(fields)
}
