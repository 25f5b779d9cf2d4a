use super::ParseContext;
use crate::html::extract::{COL_COST, COL_DATE, ColumnIndex, RECORD_COLUMNS, RowFields, extract_row};
use crate::html::locator::{find_error, find_form, find_parent, own_text, rows, select_first};
use crate::html::{ElementRef, Html};
use crate::models::{Catalogue, ID_NONE, ReportPage, ReportTotals, TaskRecordStatus, TimeRecord};

pub const FORM_NAME: &str = "reportViewForm";

/// Parse a generated report.
///
/// Rows are resolved against the cached catalogue in `ctx`; names it does not
/// know become stand-ins so historical rows still render. The table ends
/// with a blank row and a totals row, which are not records.
pub fn parse_report(html: &str, ctx: &ParseContext) -> ReportPage {
    let doc = Html::parse_document(html);
    let mut catalogue = ctx.catalogue.clone();

    let (records, cost_shown) = match find_records_table(&doc) {
        Some(table) => parse_records(table, &mut catalogue, ctx),
        None => (Vec::new(), false),
    };
    let totals = ReportTotals::from_records(&records);

    log::debug!("report: {} records", records.len());

    ReportPage {
        filter: ctx.filter.clone(),
        records,
        catalogue,
        totals,
        cost_shown,
        error_message: find_error(&doc),
    }
}

/// The table whose first header cell inside the report form reads "Date".
fn find_records_table(doc: &Html) -> Option<ElementRef<'_>> {
    let form = find_form(doc, FORM_NAME)?;
    let first_header = select_first(form, "th, td.tableHeader")?;
    if own_text(first_header) != COL_DATE {
        return None;
    }
    find_parent(first_header, "table")
}

/// Records of the table, and whether it has a Cost column.
fn parse_records(
    table: ElementRef,
    catalogue: &mut Catalogue,
    ctx: &ParseContext,
) -> (Vec<TimeRecord>, bool) {
    let table_rows = rows(table);
    if table_rows.len() < 2 {
        return (Vec::new(), false);
    }
    let columns = ColumnIndex::from_header(table_rows[0], &RECORD_COLUMNS);
    let last_data_row = table_rows.len().saturating_sub(2);

    let records = table_rows[1..last_data_row.max(1)]
        .iter()
        .filter_map(|row| extract_row(*row, &columns, None, &ctx.target))
        .filter_map(|fields| build_record(fields, catalogue))
        .collect();
    (records, columns.get(COL_COST).is_some())
}

/// Rows without a readable date are dropped.
fn build_record(fields: RowFields, catalogue: &mut Catalogue) -> Option<TimeRecord> {
    let date = fields.date?;
    let mut record = TimeRecord::new(date);
    record.id = fields.id;
    record.status = TaskRecordStatus::Current;

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
    if record.project_id == ID_NONE {
        log::debug!("report row {date} has no known project");
    }

    record.set_start(fields.start);
    record.set_finish(fields.finish);
    if record.start.is_none() || record.finish.is_none() {
        record.duration = fields.duration.unwrap_or(0);
    }
    record.note = fields.note.unwrap_or_default();
    record.cost = fields.cost;
    Some(record)
}
