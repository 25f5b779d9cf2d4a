use super::ParseContext;
use super::form::parse_form_catalogue;
use super::time_list::FORM_NAME;
use crate::html::Html;
use crate::html::locator::{find_error, find_form, select_by_name, selected_option, value};
use crate::html::script::TaskScript;
use crate::models::{Catalogue, ID_NONE, Location, TaskRecordStatus, TimeEditPage, TimeRecord};
use crate::utils::time::{parse_duration, parse_system_date, parse_system_time};

/// Parse the record editor. A form without an `id` describes a new record,
/// which is tagged `Draft`; an existing record is `Current`.
pub fn parse_time_edit(html: &str, ctx: &ParseContext) -> TimeEditPage {
    let doc = Html::parse_document(html);
    let error_message = find_error(&doc);

    let Some(form) = find_form(&doc, FORM_NAME) else {
        return TimeEditPage {
            date: ctx.date,
            record: TimeRecord::new(ctx.date),
            catalogue: Catalogue::default(),
            associations_known: false,
            error_message,
        };
    };
    let field = |name: &str| select_by_name(&doc, form, name).map(value);

    let date = field("date")
        .and_then(|v| parse_system_date(&v))
        .unwrap_or(ctx.date);
    let mut record = TimeRecord::new(date);

    let form_catalogue = parse_form_catalogue(&doc, form, TaskScript::TimeForm).unwrap_or_default();
    record.project_id = form_catalogue.project_id;
    record.project_name = form_catalogue.project_name();
    record.task_id = form_catalogue.task_id;
    record.task_name = form_catalogue.task_name();

    record.id = field("id")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(ID_NONE);

    record.set_start(field("start").and_then(|v| parse_system_time(date, &v)));
    record.set_finish(field("finish").and_then(|v| parse_system_time(date, &v)));
    if record.start.is_none() || record.finish.is_none() {
        record.duration = field("duration")
            .and_then(|v| parse_duration(&v))
            .unwrap_or(0);
    }

    record.note = field("note").unwrap_or_default();
    record.location = select_by_name(&doc, form, "time_field_5")
        .and_then(selected_option)
        .map(|o| Location::from_value(&value(o)))
        .unwrap_or_default();

    record.status = if record.id == ID_NONE {
        TaskRecordStatus::Draft
    } else {
        TaskRecordStatus::Current
    };

    TimeEditPage {
        date,
        record,
        catalogue: form_catalogue.catalogue,
        associations_known: form_catalogue.associations_known,
        error_message,
    }
}
