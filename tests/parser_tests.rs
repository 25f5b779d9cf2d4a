use worktracker::models::{
    Catalogue, Location, Page, Project, ProjectTask, ProjectTaskKey, ReportTimePeriod,
    TaskRecordStatus, UNKNOWN,
};
use worktracker::parser::report_form::find_selected_period;
use worktracker::parser::{PageKind, parse_page};

mod common;
use common::{context, date, fixture};

const HOUR: i64 = 3_600_000;
const MINUTE: i64 = 60_000;

#[test]
fn test_time_list_records_and_catalogue() {
    let page = match parse_page(PageKind::TimeList, &fixture("time_list.html"), &context("2024-02-29")) {
        Page::TimeList(p) => p,
        other => panic!("unexpected page {other:?}"),
    };

    // The form's date wins over the context day.
    assert_eq!(page.date, date("2024-03-01"));
    assert!(page.associations_known);
    assert_eq!(page.error_message, None);

    let names: Vec<&str> = page.catalogue.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "Beta"]);
    assert_eq!(page.catalogue.tasks.len(), 2);

    // Project 9 is not in the form, so its mined tasks are dropped.
    assert_eq!(
        page.catalogue.keys(),
        vec![
            ProjectTaskKey::new(1, 10),
            ProjectTaskKey::new(1, 11),
            ProjectTaskKey::new(2, 11),
        ]
    );

    assert_eq!(page.records.len(), 2);
    let first = &page.records[0];
    assert_eq!(first.id, 101);
    assert_eq!((first.project_id, first.task_id), (1, 10));
    assert_eq!(first.elapsed(), 2 * HOUR + 30 * MINUTE);
    assert_eq!(first.note, "Kickoff\nnotes");
    assert_eq!(first.status, TaskRecordStatus::Current);

    let second = &page.records[1];
    assert_eq!(second.id, 102);
    assert_eq!((second.project_id, second.task_id), (2, 11));
    assert_eq!(second.start, None);
    assert_eq!(second.duration, HOUR + 15 * MINUTE);

    assert_eq!(page.totals.daily, 3 * HOUR + 45 * MINUTE);
    assert_eq!(page.totals.weekly, 27 * HOUR + 15 * MINUTE);
    assert_eq!(page.totals.monthly, 40 * HOUR);
    assert_eq!(page.totals.remaining, -2 * HOUR);
}

#[test]
fn test_time_list_without_script_leaves_associations_unknown() {
    let html = fixture("time_list.html").replace("var task_ids = new Array();", "");
    let page = match parse_page(PageKind::TimeList, &html, &context("2024-03-01")) {
        Page::TimeList(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    assert!(!page.associations_known);
    assert!(page.catalogue.keys().is_empty());
    assert_eq!(page.records.len(), 2);
}

#[test]
fn test_time_list_empty_page_has_no_records() {
    let page = match parse_page(PageKind::TimeList, "<html><body></body></html>", &context("2024-03-05")) {
        Page::TimeList(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    assert_eq!(page.date, date("2024-03-05"));
    assert!(page.records.is_empty());
    assert!(page.catalogue.is_empty());
    assert_eq!(page.totals.daily, UNKNOWN);
}

#[test]
fn test_time_edit_reads_form() {
    let page = match parse_page(PageKind::TimeEdit, &fixture("time_edit.html"), &context("2024-02-01")) {
        Page::TimeEdit(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    let record = &page.record;

    assert_eq!(record.id, 101);
    assert_eq!(record.date, date("2024-03-01"));
    assert_eq!((record.project_id, record.project_name.as_str()), (1, "Alpha"));
    assert_eq!((record.task_id, record.task_name.as_str()), (10, "Design"));
    assert_eq!(record.elapsed(), 3 * HOUR);
    assert_eq!(record.duration, 0);
    assert_eq!(record.note, "Kickoff revised");
    assert_eq!(record.location, Location::Office);
    assert_eq!(record.status, TaskRecordStatus::Current);
}

#[test]
fn test_time_edit_new_record_is_draft() {
    let html = fixture("time_edit.html").replace(r#"<input type="hidden" name="id" value="101">"#, "");
    let page = match parse_page(PageKind::TimeEdit, &html, &context("2024-03-01")) {
        Page::TimeEdit(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    assert!(!page.record.has_identity());
    assert_eq!(page.record.status, TaskRecordStatus::Draft);
}

#[test]
fn test_report_form_filter() {
    let page = match parse_page(PageKind::ReportForm, &fixture("report_form.html"), &context("2024-03-10")) {
        Page::ReportForm(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    let filter = &page.filter;

    assert_eq!(filter.project_id, 1);
    assert_eq!(filter.task_id, 0);
    assert_eq!(filter.period, ReportTimePeriod::ThisMonth);
    assert_eq!(filter.start, Some(date("2024-03-01")));
    assert_eq!(filter.finish, Some(date("2024-03-31")));
    assert_eq!(filter.favorite, None);

    assert!(filter.show_project_field);
    assert!(!filter.show_start_field);
    assert!(!filter.show_finish_field);
    assert!(filter.show_cost_field);
    // No location checkbox on this form: the filter's value is kept.
    assert!(!filter.show_location_field);

    // Scenario: project 7 is mined but not offered, so it is discarded.
    assert!(page.associations_known);
    assert!(page.catalogue.project(7).is_none());
    assert_eq!(
        page.catalogue.keys(),
        vec![ProjectTaskKey::new(1, 10), ProjectTaskKey::new(1, 11)]
    );
}

#[test]
fn test_report_form_keeps_visibility_of_absent_checkboxes() {
    let html = fixture("report_form.html").replace(
        r#"<input type="checkbox" name="chcost" value="1" checked> Cost"#,
        "",
    );
    let mut ctx = context("2024-03-10");
    ctx.filter.show_cost_field = true;
    ctx.filter.show_location_field = true;

    let page = match parse_page(PageKind::ReportForm, &html, &ctx) {
        Page::ReportForm(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    assert!(page.filter.show_cost_field);
    assert!(page.filter.show_location_field);
}

#[test]
fn test_selected_period_falls_back_to_custom() {
    let none_selected = scraper::Html::parse_document(
        r#"<select name="period"><option value="1">today</option><option value="3">month</option></select>"#,
    );
    let select = worktracker::html::locator::select_first(none_selected.root_element(), "select")
        .expect("select");
    assert_eq!(find_selected_period(select), ReportTimePeriod::Custom);

    let unknown = scraper::Html::parse_document(
        r#"<select name="period"><option value="99" selected>someday</option></select>"#,
    );
    let select = worktracker::html::locator::select_first(unknown.root_element(), "select")
        .expect("select");
    assert_eq!(find_selected_period(select), ReportTimePeriod::Custom);
}

#[test]
fn test_report_resolves_against_cached_catalogue() {
    let mut alpha = Project::new(1, "Alpha");
    alpha.task_ids = vec![10];
    let cached = Catalogue::new(vec![alpha], vec![ProjectTask::new(10, "Design")]);
    let ctx = context("2024-03-10").with_catalogue(cached);

    let page = match parse_page(PageKind::Report, &fixture("report.html"), &ctx) {
        Page::Report(p) => p,
        other => panic!("unexpected page {other:?}"),
    };

    // The blank spacer row and the totals row are not records.
    assert_eq!(page.records.len(), 2);

    let known = &page.records[0];
    assert_eq!((known.id, known.project_id, known.task_id), (101, 1, 10));
    assert_eq!(known.cost, 125.5);

    let historical = &page.records[1];
    assert_eq!(historical.id, 0);
    assert_eq!(historical.project_id, 0);
    assert_eq!(historical.project_name, "Retired");
    assert_eq!(historical.task_name, "Legacy");
    assert_eq!(historical.duration, HOUR);
    assert_eq!(historical.cost, 1000.0);

    // Stand-ins are added to the page's catalogue, not invented with ids.
    assert!(page.catalogue.projects.iter().any(|p| p.name == "Retired" && !p.has_identity()));
    assert_eq!(page.catalogue.identified().0.len(), 1);

    assert_eq!(page.totals.duration, 3 * HOUR + 30 * MINUTE);
    assert_eq!(page.totals.cost, 1125.5);
}

#[test]
fn test_admin_listings() {
    let projects = match parse_page(PageKind::Projects, &fixture("projects.html"), &context("2024-03-01")) {
        Page::Projects(p) => p.projects,
        other => panic!("unexpected page {other:?}"),
    };
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "Alpha");
    assert_eq!(projects[0].description, "First project");
    assert!(!projects[0].has_identity());

    let tasks = match parse_page(PageKind::Tasks, &fixture("tasks.html"), &context("2024-03-01")) {
        Page::Tasks(p) => p.tasks,
        other => panic!("unexpected page {other:?}"),
    };
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Design", "Build", "Test"]);

    let users = match parse_page(PageKind::Users, &fixture("users.html"), &context("2024-03-01")) {
        Page::Users(p) => p.users,
        other => panic!("unexpected page {other:?}"),
    };
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].display_name, "Ann Smith");
    assert_eq!(users[0].login, "ann");
    assert_eq!(users[0].roles, ["User", "Manager"]);
    assert!(users[0].uncompleted_entry);
    assert_eq!(users[1].id, 2);
    assert!(!users[1].uncompleted_entry);
}

#[test]
fn test_error_banner_is_page_data() {
    let page = parse_page(PageKind::TimeList, &fixture("error.html"), &context("2024-03-01"));
    assert_eq!(page.error_message(), Some("Incorrect date.\nPlease try again."));
}

#[test]
fn test_overflowing_durations_degrade_to_defaults() {
    let totals_page = r#"<div class="day-totals"><table><tr>
        <td>Day total: 99999999999999:00</td><td>Week total: 27:15</td>
    </tr></table></div>"#;
    let page = match parse_page(PageKind::TimeList, totals_page, &context("2024-03-01")) {
        Page::TimeList(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    assert_eq!(page.totals.daily, UNKNOWN);
    assert_eq!(page.totals.weekly, 27 * HOUR + 15 * MINUTE);

    let html = fixture("report.html").replacen("02:30", "99999999999999:00", 1);
    let mut ctx = context("2024-03-10");
    ctx.filter.start = Some(date("2024-03-01"));
    ctx.filter.finish = Some(date("2024-03-31"));
    let page = match parse_page(PageKind::Report, &html, &ctx) {
        Page::Report(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    // The bad cell is dropped; its row and the next one still parse.
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[1].duration, HOUR);
}

#[test]
fn test_report_notes_cost_column() {
    let page = match parse_page(PageKind::Report, &fixture("report.html"), &context("2024-03-10")) {
        Page::Report(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    assert!(page.cost_shown);

    let html = fixture("report.html").replace("<th>Cost</th>", "<th>Fee</th>");
    let page = match parse_page(PageKind::Report, &html, &context("2024-03-10")) {
        Page::Report(p) => p,
        other => panic!("unexpected page {other:?}"),
    };
    assert!(!page.cost_shown);
    assert!(page.records.iter().all(|r| r.cost == 0.0));
}
