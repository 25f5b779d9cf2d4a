use super::ParseContext;
use super::form::parse_form_catalogue;
use crate::html::Html;
use crate::html::extract::{
    COL_PROJECT, COL_START, COL_TASK, ColumnIndex, RECORD_COLUMNS, extract_row, is_header_row,
};
use crate::html::locator::{
    find_error, find_form, find_table, rows, select_by_name, select_first, selector, text, value,
};
use crate::html::script::TaskScript;
use crate::models::{Catalogue, TaskRecordStatus, TimeListPage, TimeRecord, TimeTotals, UNKNOWN};
use crate::utils::time::{parse_duration, parse_system_date};
use chrono::NaiveDate;

pub const FORM_NAME: &str = "timeRecordForm";

/// Parse the day view: the booking form, the day's records and its totals.
pub fn parse_time_list(html: &str, ctx: &ParseContext) -> TimeListPage {
    let doc = Html::parse_document(html);

    let form = find_form(&doc, FORM_NAME);
    let date = form
        .and_then(|f| select_by_name(&doc, f, "date"))
        .and_then(|input| parse_system_date(&value(input)))
        .unwrap_or(ctx.date);

    let form_catalogue = form.and_then(|f| parse_form_catalogue(&doc, f, TaskScript::TimeForm));
    let (mut catalogue, associations_known) = match form_catalogue {
        Some(fc) => (fc.catalogue, fc.associations_known),
        None => (Catalogue::default(), false),
    };

    let records = parse_records(&doc, date, &mut catalogue, ctx);
    let totals = parse_totals(&doc);

    log::debug!("time list {date}: {} records", records.len());

    TimeListPage {
        date,
        records,
        catalogue,
        associations_known,
        totals,
        error_message: find_error(&doc),
    }
}

fn parse_records(
    doc: &Html,
    date: NaiveDate,
    catalogue: &mut Catalogue,
    ctx: &ParseContext,
) -> Vec<TimeRecord> {
    let root = doc.root_element();
    let scope = select_first(root, "div.record-list").unwrap_or(root);
    let Some(table) = find_table(scope, &[COL_PROJECT, COL_TASK, COL_START]) else {
        return Vec::new();
    };

    let table_rows = rows(table);
    let Some(header) = table_rows.iter().copied().find(|r| is_header_row(*r)) else {
        return Vec::new();
    };
    let columns = ColumnIndex::from_header(header, &RECORD_COLUMNS);

    let mut records = Vec::new();
    for row in table_rows {
        let Some(fields) = extract_row(row, &columns, Some(date), &ctx.target) else {
            continue;
        };

        let mut record = TimeRecord::new(fields.date.unwrap_or(date));
        record.id = fields.id;

        if let Some(name) = fields.project.as_deref().filter(|n| !n.is_empty()) {
            let project = catalogue.resolve_project(name);
            record.project_id = project.id;
            record.project_name = project.name.clone();
        }
        if let Some(name) = fields.task.as_deref().filter(|n| !n.is_empty()) {
            let task = catalogue.resolve_task(record.project_id, name);
            record.task_id = task.id;
            record.task_name = task.name.clone();
        }

        record.set_start(fields.start);
        record.set_finish(fields.finish);
        if record.start.is_none() || record.finish.is_none() {
            record.duration = fields.duration.unwrap_or(0);
        }
        record.note = fields.note.unwrap_or_default();
        record.cost = fields.cost;
        record.status = TaskRecordStatus::Current;
        records.push(record);
    }
    records
}

/// Read the "Day total:", "Week total:", "Month total:" and
/// "Remaining quota:" cells. A label without a readable value is `UNKNOWN`.
pub fn parse_totals(doc: &Html) -> TimeTotals {
    let mut totals = TimeTotals::default();
    let root = doc.root_element();
    let scope = select_first(root, "div.day-totals").unwrap_or(root);

    let Some(sel) = selector("td") else {
        return totals;
    };
    for cell in scope.select(&sel) {
        let content = text(cell);
        let Some((label, rest)) = content.split_once(':') else {
            continue;
        };
        let amount = parse_duration(rest).unwrap_or(UNKNOWN);
        match label.trim() {
            "Day total" => totals.daily = amount,
            "Week total" => totals.weekly = amount,
            "Month total" => totals.monthly = amount,
            "Remaining quota" => totals.remaining = amount,
            _ => {}
        }
    }
    totals
}
