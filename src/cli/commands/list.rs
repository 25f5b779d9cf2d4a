use super::date_arg;
use crate::cli::parser::{Commands, ListTarget};
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries::{Collection, RecordStore, ReportStore, load_catalogue};
use crate::errors::AppResult;
use crate::models::{Catalogue, ReportTotals, TimeRecord};
use crate::ui::messages::{header, info};
use crate::utils::colors::colorize_optional;
use crate::utils::date::today;
use crate::utils::table::{Column, Table};
use crate::utils::time::{format_system_date, format_system_time};
use crate::utils::format_duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { what, from, to } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        let from = date_arg(from.as_ref())?;
        let to = date_arg(to.as_ref())?;

        match what {
            ListTarget::Projects | ListTarget::Tasks => {
                let catalogue = load_catalogue(&pool.conn)?;
                if *what == ListTarget::Projects {
                    print_projects(&catalogue);
                } else {
                    print_tasks(&catalogue);
                }
            }
            ListTarget::Records => {
                let first = from.or(to).unwrap_or_else(today);
                let last = to.unwrap_or(first);
                let records = RecordStore::new(&pool.conn).list_between(first, last)?;
                header(format!(
                    "Time records {} → {}",
                    format_system_date(first),
                    format_system_date(last)
                ));
                print_records(&records);
            }
            ListTarget::Report => {
                let store = ReportStore::new(&pool.conn);
                let records = match (from, to) {
                    (None, None) => store.list_all()?,
                    (first, last) => {
                        let first = first.or(last).unwrap_or_else(today);
                        store.list_between(first, last.unwrap_or(first))?
                    }
                };
                header("Cached report");
                print_records(&records);
                print_report_totals(&ReportTotals::from_records(&records));
            }
        }
    }

    Ok(())
}

fn clock(ts: Option<chrono::NaiveDateTime>) -> String {
    ts.map(format_system_time)
        .unwrap_or_else(|| "--:--".to_string())
}

pub(crate) fn print_records(records: &[TimeRecord]) {
    if records.is_empty() {
        info("No records.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("DATE", 10),
        Column::new("PROJECT", 18),
        Column::new("TASK", 18),
        Column::new("START", 5),
        Column::new("END", 5),
        Column::new("TIME", 6),
        Column::new("COST", 8),
        Column::new("WHERE", 6),
        Column::new("NOTE", 30),
    ]);

    for r in records {
        table.add_row(vec![
            r.id.to_string(),
            format_system_date(r.date),
            r.project_name.clone(),
            r.task_name.clone(),
            clock(r.start),
            clock(r.finish),
            format_duration(r.elapsed()),
            format!("{:.2}", r.cost),
            r.location.label().to_string(),
            r.note.replace('\n', " "),
        ]);
    }

    print!("{}", table.render());
}

pub(crate) fn print_report_totals(totals: &ReportTotals) {
    if !totals.is_known() {
        return;
    }
    println!();
    println!("Total time: {}", colorize_optional(&format_duration(totals.duration)));
    println!("Total cost: {:.2}", totals.cost);
}

pub(crate) fn print_projects(catalogue: &Catalogue) {
    header("Projects");
    if catalogue.projects.is_empty() {
        info("No projects.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("NAME", 24),
        Column::new("TASKS", 40),
        Column::new("DESCRIPTION", 30),
    ]);
    for p in &catalogue.projects {
        let tasks = catalogue
            .tasks_of(p)
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            p.id.to_string(),
            p.name.clone(),
            if tasks.is_empty() { "-".to_string() } else { tasks },
            p.description.clone(),
        ]);
    }
    print!("{}", table.render());
}

pub(crate) fn print_tasks(catalogue: &Catalogue) {
    header("Tasks");
    if catalogue.tasks.is_empty() {
        info("No tasks.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("NAME", 24),
        Column::new("DESCRIPTION", 40),
    ]);
    for t in &catalogue.tasks {
        table.add_row(vec![t.id.to_string(), t.name.clone(), t.description.clone()]);
    }
    print!("{}", table.render());
}
