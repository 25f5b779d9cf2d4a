use super::ParseContext;
use super::form::parse_form_catalogue;
use crate::html::locator::{
    find_error, find_form, is_checked, select_by_name, selected_option, value,
};
use crate::html::script::TaskScript;
use crate::html::{ElementRef, Html};
use crate::models::{
    Catalogue, Location, ReportFilter, ReportFormPage, ReportTimePeriod, TaskRecordStatus,
};
use crate::utils::time::parse_system_date;

pub const FORM_NAME: &str = "reportForm";

/// Period marked `selected`. Falls back to `Custom` when no option is
/// marked or the marked value is not one of the known periods.
pub fn find_selected_period(select: ElementRef) -> ReportTimePeriod {
    selected_option(select)
        .and_then(|o| ReportTimePeriod::from_value(value(o).trim()))
        .unwrap_or(ReportTimePeriod::Custom)
}

/// Parse the report form starting from `ctx.filter`: every control the page
/// omits leaves the corresponding filter value as it was.
pub fn parse_report_form(html: &str, ctx: &ParseContext) -> ReportFormPage {
    let doc = Html::parse_document(html);
    let mut filter = ctx.filter.clone();
    let error_message = find_error(&doc);

    let Some(form) = find_form(&doc, FORM_NAME) else {
        return ReportFormPage {
            filter,
            catalogue: Catalogue::default(),
            associations_known: false,
            error_message,
        };
    };

    let form_catalogue = parse_form_catalogue(&doc, form, TaskScript::ReportForm).unwrap_or_default();
    filter.project_id = form_catalogue.project_id;
    filter.task_id = form_catalogue.task_id;

    populate_filter(&doc, form, &mut filter);
    if filter.start.is_none() || filter.finish.is_none() {
        filter.update_dates(ctx.date);
    }
    filter.status = TaskRecordStatus::Current;

    ReportFormPage {
        filter,
        catalogue: form_catalogue.catalogue,
        associations_known: form_catalogue.associations_known,
        error_message,
    }
}

fn populate_filter(doc: &Html, form: ElementRef, filter: &mut ReportFilter) {
    let input = |name: &str| select_by_name(doc, form, name);

    if let Some(select) = input("period") {
        filter.period = find_selected_period(select);
    }
    if let Some(el) = input("start_date") {
        filter.start = parse_system_date(&value(el));
    }
    if let Some(el) = input("end_date") {
        filter.finish = parse_system_date(&value(el));
    }
    if let Some(select) = input("time_field_5") {
        filter.location = selected_option(select)
            .map(|o| Location::from_value(&value(o)))
            .unwrap_or_default();
    }
    if let Some(select) = input("favorite_report") {
        filter.favorite = selected_option(select)
            .map(|o| value(o).trim().to_string())
            .filter(|v| !v.is_empty() && v != "-1");
    }

    let checkbox = |name: &str, current: bool| input(name).map(is_checked).unwrap_or(current);
    filter.show_project_field = checkbox("chproject", filter.show_project_field);
    filter.show_task_field = checkbox("chtask", filter.show_task_field);
    filter.show_start_field = checkbox("chstart", filter.show_start_field);
    filter.show_finish_field = checkbox("chfinish", filter.show_finish_field);
    filter.show_duration_field = checkbox("chduration", filter.show_duration_field);
    filter.show_note_field = checkbox("chnote", filter.show_note_field);
    filter.show_cost_field = checkbox("chcost", filter.show_cost_field);
    filter.show_location_field = checkbox("chtime_field_5", filter.show_location_field);
}
