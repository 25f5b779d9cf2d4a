//! Page Model Builder: one parser per screen of the server, all producing a
//! [`Page`]. Parsing is pure and never fails; problems degrade to defaults
//! and the server's own error banner is carried on the page.

pub mod catalogue;
pub mod form;
pub mod report;
pub mod report_form;
pub mod time_edit;
pub mod time_list;

use crate::html::extract::EditTarget;
use crate::models::{Catalogue, Page, ReportFilter};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

/// The screens this crate knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    /// time.php: a day's records
    TimeList,
    /// time_edit.php: one record
    TimeEdit,
    /// reports.php: the report filter form
    ReportForm,
    /// report.php: a generated report
    Report,
    /// projects.php
    Projects,
    /// tasks.php
    Tasks,
    /// users.php
    Users,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::TimeList => "time-list",
            PageKind::TimeEdit => "time-edit",
            PageKind::ReportForm => "report-form",
            PageKind::Report => "report",
            PageKind::Projects => "projects",
            PageKind::Tasks => "tasks",
            PageKind::Users => "users",
        }
    }
}

/// Inputs a parser needs beyond the markup, owned by the caller.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub target: EditTarget,
    /// Day assumed when the page does not say which day it shows.
    pub date: NaiveDate,
    /// Catalogue cached locally; report rows are resolved against it.
    pub catalogue: Catalogue,
    /// The filter a report was requested with, or the form's starting state.
    pub filter: ReportFilter,
}

impl ParseContext {
    pub fn new(target: EditTarget, date: NaiveDate) -> Self {
        Self {
            target,
            date,
            catalogue: Catalogue::default(),
            filter: ReportFilter::default(),
        }
    }

    pub fn with_catalogue(mut self, catalogue: Catalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    pub fn with_filter(mut self, filter: ReportFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Parse `html` as a page of the given kind.
pub fn parse_page(kind: PageKind, html: &str, ctx: &ParseContext) -> Page {
    match kind {
        PageKind::TimeList => Page::TimeList(time_list::parse_time_list(html, ctx)),
        PageKind::TimeEdit => Page::TimeEdit(time_edit::parse_time_edit(html, ctx)),
        PageKind::ReportForm => Page::ReportForm(report_form::parse_report_form(html, ctx)),
        PageKind::Report => Page::Report(report::parse_report(html, ctx)),
        PageKind::Projects => Page::Projects(catalogue::parse_projects(html)),
        PageKind::Tasks => Page::Tasks(catalogue::parse_tasks(html)),
        PageKind::Users => Page::Users(catalogue::parse_users(html)),
    }
}
