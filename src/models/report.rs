use super::{ID_NONE, Location, TaskRecordStatus, TimeRecord};
use crate::utils::date::{month_end, month_start, previous_month, week_end, week_start};
use crate::utils::time::format_system_date;
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Marks a total the page did not provide, as opposed to a zero total.
pub const UNKNOWN: i64 = i64::MIN;

/// Time periods offered by the report form, with their option values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ReportTimePeriod {
    Custom,
    Today,
    ThisWeek,
    #[default]
    ThisMonth,
    PreviousWeek,
    PreviousMonth,
    Yesterday,
}

impl ReportTimePeriod {
    pub const ALL: [ReportTimePeriod; 7] = [
        ReportTimePeriod::Custom,
        ReportTimePeriod::Today,
        ReportTimePeriod::ThisWeek,
        ReportTimePeriod::ThisMonth,
        ReportTimePeriod::PreviousWeek,
        ReportTimePeriod::PreviousMonth,
        ReportTimePeriod::Yesterday,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            ReportTimePeriod::Custom => "",
            ReportTimePeriod::Today => "1",
            ReportTimePeriod::ThisWeek => "2",
            ReportTimePeriod::ThisMonth => "3",
            ReportTimePeriod::PreviousWeek => "6",
            ReportTimePeriod::PreviousMonth => "7",
            ReportTimePeriod::Yesterday => "8",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.value() == value)
    }
}

/// Selection and column layout of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFilter {
    /// `ID_NONE` selects all projects.
    pub project_id: i64,
    /// `ID_NONE` selects all tasks.
    pub task_id: i64,
    pub period: ReportTimePeriod,
    pub start: Option<NaiveDate>,
    pub finish: Option<NaiveDate>,
    pub location: Location,
    pub favorite: Option<String>,
    pub status: TaskRecordStatus,
    pub show_project_field: bool,
    pub show_task_field: bool,
    pub show_start_field: bool,
    pub show_finish_field: bool,
    pub show_duration_field: bool,
    pub show_note_field: bool,
    pub show_cost_field: bool,
    pub show_location_field: bool,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            project_id: ID_NONE,
            task_id: ID_NONE,
            period: ReportTimePeriod::default(),
            start: None,
            finish: None,
            location: Location::Empty,
            favorite: None,
            status: TaskRecordStatus::Draft,
            show_project_field: true,
            show_task_field: true,
            show_start_field: true,
            show_finish_field: true,
            show_duration_field: true,
            show_note_field: true,
            show_cost_field: false,
            show_location_field: false,
        }
    }
}

impl ReportFilter {
    /// Derive `start`/`finish` from the period relative to `today`.
    /// A custom period keeps the bounds it has.
    pub fn update_dates(&mut self, today: NaiveDate) {
        let bounds = match self.period {
            ReportTimePeriod::Custom => return,
            ReportTimePeriod::Today => (today, today),
            ReportTimePeriod::Yesterday => {
                let day = today - Days::new(1);
                (day, day)
            }
            ReportTimePeriod::ThisWeek => (week_start(today), week_end(today)),
            ReportTimePeriod::PreviousWeek => {
                let day = today - Days::new(7);
                (week_start(day), week_end(day))
            }
            ReportTimePeriod::ThisMonth => (month_start(today), month_end(today)),
            ReportTimePeriod::PreviousMonth => {
                let day = previous_month(today);
                (month_start(day), month_end(day))
            }
        };
        self.start = Some(bounds.0);
        self.finish = Some(bounds.1);
    }

    /// Form fields to post to the report generator.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        let id = |id: i64| if id == ID_NONE { String::new() } else { id.to_string() };
        let date = |d: Option<NaiveDate>| d.map(format_system_date).unwrap_or_default();

        let mut fields = vec![
            ("project", id(self.project_id)),
            ("task", id(self.task_id)),
            ("period", self.period.value().to_string()),
            ("start_date", date(self.start)),
            ("end_date", date(self.finish)),
            ("time_field_5", id(self.location.id())),
        ];

        let checks = [
            ("chproject", self.show_project_field),
            ("chtask", self.show_task_field),
            ("chstart", self.show_start_field),
            ("chfinish", self.show_finish_field),
            ("chduration", self.show_duration_field),
            ("chnote", self.show_note_field),
            ("chcost", self.show_cost_field),
            ("chtime_field_5", self.show_location_field),
        ];
        for (name, checked) in checks {
            if checked {
                fields.push((name, "1".to_string()));
            }
        }

        fields.push(("group_by1", "no_grouping".to_string()));
        fields.push(("group_by2", "no_grouping".to_string()));
        fields.push(("group_by3", "no_grouping".to_string()));
        fields.push((
            "favorite_report",
            self.favorite.clone().unwrap_or_else(|| "-1".to_string()),
        ));
        fields.push(("new_fav_report", String::new()));
        fields.push(("fav_report_changed", String::new()));
        fields
    }
}

/// Sums over the rows of a report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportTotals {
    pub duration: i64,
    pub cost: f64,
}

impl Default for ReportTotals {
    fn default() -> Self {
        Self {
            duration: UNKNOWN,
            cost: 0.0,
        }
    }
}

impl ReportTotals {
    /// Durations below zero count as zero; costs are summed as they are.
    pub fn from_records(records: &[TimeRecord]) -> Self {
        let mut totals = Self {
            duration: 0,
            cost: 0.0,
        };
        for record in records {
            totals.duration = totals.duration.saturating_add(record.elapsed().max(0));
            totals.cost += record.cost;
        }
        totals
    }

    pub fn is_known(&self) -> bool {
        self.duration != UNKNOWN
    }
}

/// Day, week and month sums printed under the day's time list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeTotals {
    pub daily: i64,
    pub weekly: i64,
    pub monthly: i64,
    pub remaining: i64,
}

impl Default for TimeTotals {
    fn default() -> Self {
        Self {
            daily: UNKNOWN,
            weekly: UNKNOWN,
            monthly: UNKNOWN,
            remaining: UNKNOWN,
        }
    }
}
