//! Mining the project → task relation out of inline `<script>` blocks.
//!
//! The server renders the task ids allowed per project as JavaScript array
//! assignments. Only those fixed shapes are matched; nothing is evaluated.

use super::locator::selector;
use regex::Regex;
use scraper::Html;

/// Start marker of the task table on the time pages.
pub const TIME_TASKS_START: &str = "var task_ids = new Array();";
/// Start marker of the task table on the report form.
pub const REPORT_TASKS_START: &str = "// Populate obj_tasks with task ids for each relevant project.";
/// End marker shared by both pages.
pub const TASKS_END: &str = "// Prepare an array of task names.";

/// `task_ids[14] = "1,5";`
const TIME_TASKS_PATTERN: &str = r#"task_ids\[(\d+)\] = "(.+)";"#;
/// `project_property = project_prefix + 14;` then `obj_tasks[project_property] = "1,5";`
const REPORT_TASKS_PATTERN: &str =
    r#"project_property = project_prefix [+] (\d+);\s+obj_tasks\[project_property\] = "(.+)";"#;

/// Which of the two script conventions a page uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScript {
    TimeForm,
    ReportForm,
}

impl TaskScript {
    fn markers(self) -> (&'static str, &'static str) {
        match self {
            TaskScript::TimeForm => (TIME_TASKS_START, TASKS_END),
            TaskScript::ReportForm => (REPORT_TASKS_START, TASKS_END),
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            TaskScript::TimeForm => TIME_TASKS_PATTERN,
            TaskScript::ReportForm => REPORT_TASKS_PATTERN,
        }
    }
}

/// Text between `start` and `end` in the first script that contains `start`.
/// Runs to the end of that script when `end` is missing; empty when no
/// script contains `start`.
pub fn find_script(doc: &Html, start: &str, end: &str) -> String {
    let Some(sel) = selector("script") else {
        return String::new();
    };

    for script in doc.select(&sel) {
        let body: String = script.text().collect();
        if let Some(index) = body.find(start) {
            let from = index + start.len();
            let to = body[from..].find(end).map_or(body.len(), |i| from + i);
            return body[from..to].to_string();
        }
    }

    String::new()
}

/// Apply `pattern` to `script`, yielding `(project id, task ids)` pairs in
/// source order. Ids that do not parse are skipped.
pub fn mine_task_ids(script: &str, pattern: &str) -> Vec<(i64, Vec<i64>)> {
    let Ok(re) = Regex::new(pattern) else {
        return Vec::new();
    };

    re.captures_iter(script)
        .filter_map(|caps| {
            let project_id = caps.get(1)?.as_str().parse::<i64>().ok()?;
            let task_ids = caps
                .get(2)?
                .as_str()
                .split(',')
                .filter_map(|id| id.trim().parse::<i64>().ok())
                .collect();
            Some((project_id, task_ids))
        })
        .collect()
}

/// Locate and mine the task table of `kind`. `None` when the page carries no
/// such script, which callers must tell apart from an empty table.
pub fn project_task_ids(doc: &Html, kind: TaskScript) -> Option<Vec<(i64, Vec<i64>)>> {
    let (start, end) = kind.markers();
    let script = find_script(doc, start, end);
    if script.is_empty() {
        return None;
    }
    Some(mine_task_ids(&script, kind.pattern()))
}
