use super::{cached_catalogue, parse_context, read_page};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::parser::parse_page;
use crate::sync::{Counts, SyncReport, save_page};
use crate::ui::messages::{success, warning};
use crate::utils::colors::{GREEN, RED, YELLOW, colorize_count};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync {
        kind,
        file,
        date,
        from,
        to,
        force,
    } = cmd
    {
        let html = read_page(file)?;

        let mut pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        let ctx = parse_context(
            cfg,
            date.as_ref(),
            from.as_ref(),
            to.as_ref(),
            cached_catalogue(&pool.conn),
        )?;
        let page = parse_page(*kind, &html, &ctx);

        if let Some(message) = page.error_message() {
            if !*force {
                return Err(AppError::Server(message.to_string()));
            }
            warning(format!("Server error on page, reconciling anyway: {message}"));
        }

        let report = save_page(&mut pool.conn, &page)?;
        print_report(kind.as_str(), &report);
    }

    Ok(())
}

fn print_counts(label: &str, counts: &Counts) {
    println!(
        "  {:<9} +{}  ~{}  -{}",
        label,
        colorize_count(counts.inserted, GREEN),
        colorize_count(counts.updated, YELLOW),
        colorize_count(counts.deleted, RED)
    );
}

fn print_report(kind: &str, report: &SyncReport) {
    if report.is_noop() {
        success(format!("{kind}: cache already up to date"));
        return;
    }

    success(format!("{kind}: {}", report.summary()));
    print_counts("projects", &report.projects);
    print_counts("tasks", &report.tasks);
    print_counts("links", &report.keys);
    print_counts("records", &report.records);
    print_counts("report", &report.report);
    if report.cascaded > 0 {
        println!("  cascaded  -{}", colorize_count(report.cascaded, RED));
    }
}
