pub mod config;
pub mod db;
pub mod init;
pub mod list;
pub mod log;
pub mod parse;
pub mod sync;

use crate::config::Config;
use crate::db::queries::load_catalogue;
use crate::errors::{AppError, AppResult};
use crate::models::{Catalogue, ReportFilter, ReportTimePeriod};
use crate::parser::ParseContext;
use crate::utils::date::today;
use crate::utils::time::parse_system_date;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::fs;
use std::io::{self, Read};

/// Page markup from a file, or from stdin when `file` is "-".
pub(crate) fn read_page(file: &str) -> AppResult<String> {
    if file == "-" {
        let mut html = String::new();
        io::stdin().read_to_string(&mut html)?;
        return Ok(html);
    }
    Ok(fs::read_to_string(file)?)
}

pub(crate) fn date_arg(arg: Option<&String>) -> AppResult<Option<NaiveDate>> {
    match arg {
        None => Ok(None),
        Some(text) => parse_system_date(text)
            .map(Some)
            .ok_or_else(|| AppError::InvalidDate(text.clone())),
    }
}

/// Parser inputs from the config and the command line. A `--from`/`--to`
/// pair becomes a custom report period; without one a report's range is
/// the span of its rows.
pub(crate) fn parse_context(
    cfg: &Config,
    date: Option<&String>,
    from: Option<&String>,
    to: Option<&String>,
    catalogue: Catalogue,
) -> AppResult<ParseContext> {
    let day = date_arg(date)?.unwrap_or_else(today);

    let mut filter = ReportFilter::default();
    let (from, to) = (date_arg(from)?, date_arg(to)?);
    if from.is_some() || to.is_some() {
        filter.period = ReportTimePeriod::Custom;
        filter.start = from.or(to);
        filter.finish = to.or(from);
    }

    Ok(ParseContext::new(cfg.edit_target()?, day)
        .with_catalogue(catalogue)
        .with_filter(filter))
}

/// The cached catalogue, so report rows resolve to known ids.
pub(crate) fn cached_catalogue(conn: &Connection) -> Catalogue {
    load_catalogue(conn).unwrap_or_else(|e| {
        ::log::debug!("no cached catalogue: {e}");
        Catalogue::default()
    })
}
