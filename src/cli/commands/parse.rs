use super::list::{print_projects, print_records, print_report_totals, print_tasks};
use super::{cached_catalogue, parse_context, read_page};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::{Catalogue, Page, TimeTotals, UNKNOWN, User};
use crate::parser::parse_page;
use crate::ui::messages::{header, info, warning};
use crate::utils::format_duration;
use crate::utils::table::{Column, Table};
use crate::utils::time::format_system_date;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Parse {
        kind,
        file,
        date,
        from,
        to,
        json,
    } = cmd
    {
        let html = read_page(file)?;

        // Report rows resolve against the cache when there is one; parsing
        // never creates the database.
        let catalogue = if Path::new(&cfg.database).exists() {
            DbPool::new(&cfg.database)
                .map(|pool| cached_catalogue(&pool.conn))
                .unwrap_or_default()
        } else {
            Catalogue::default()
        };

        let ctx = parse_context(cfg, date.as_ref(), from.as_ref(), to.as_ref(), catalogue)?;
        let page = parse_page(*kind, &html, &ctx);
        ::log::debug!("parsed {} page from {}", kind.as_str(), file);

        if *json {
            println!("{}", serde_json::to_string_pretty(&page)?);
        } else {
            print_page(&page);
        }
    }

    Ok(())
}

fn print_page(page: &Page) {
    if let Some(message) = page.error_message() {
        warning(format!("Server error on page: {message}"));
    }

    match page {
        Page::TimeList(p) => {
            header(format!("Time records {}", format_system_date(p.date)));
            print_records(&p.records);
            print_time_totals(&p.totals);
            print_catalogue_summary(&p.catalogue, p.associations_known);
        }
        Page::TimeEdit(p) => {
            header(format!("Record {}", format_system_date(p.date)));
            print_records(std::slice::from_ref(&p.record));
            print_catalogue_summary(&p.catalogue, p.associations_known);
        }
        Page::ReportForm(p) => {
            header("Report filter");
            for (name, value) in p.filter.to_fields() {
                println!("{name:<20} {value}");
            }
            println!();
            print_catalogue_summary(&p.catalogue, p.associations_known);
        }
        Page::Report(p) => {
            header("Report");
            print_records(&p.records);
            print_report_totals(&p.totals);
        }
        Page::Projects(p) => print_projects(&Catalogue::new(p.projects.clone(), Vec::new())),
        Page::Tasks(p) => print_tasks(&Catalogue::new(Vec::new(), p.tasks.clone())),
        Page::Users(p) => print_users(&p.users),
    }
}

fn print_time_totals(totals: &TimeTotals) {
    let shown = |value: i64| {
        if value == UNKNOWN {
            "--:--".to_string()
        } else {
            format_duration(value)
        }
    };
    println!();
    println!(
        "Day {}  Week {}  Month {}  Remaining {}",
        shown(totals.daily),
        shown(totals.weekly),
        shown(totals.monthly),
        shown(totals.remaining)
    );
}

fn print_catalogue_summary(catalogue: &Catalogue, associations_known: bool) {
    let links = if associations_known {
        catalogue.keys().len().to_string()
    } else {
        "unknown".to_string()
    };
    info(format!(
        "{} projects, {} tasks, project/task links: {}",
        catalogue.projects.len(),
        catalogue.tasks.len(),
        links
    ));
}

fn print_users(users: &[User]) {
    header("Users");
    if users.is_empty() {
        info("No users.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("#", 3),
        Column::new("NAME", 24),
        Column::new("LOGIN", 16),
        Column::new("ROLES", 24),
        Column::new("OPEN", 4),
    ]);
    for u in users {
        table.add_row(vec![
            u.id.to_string(),
            u.display_name.clone(),
            u.login.clone(),
            u.roles.join(", "),
            (if u.uncompleted_entry { "yes" } else { "" }).to_string(),
        ]);
    }
    print!("{}", table.render());
}
