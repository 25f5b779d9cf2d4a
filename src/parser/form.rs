//! Helpers shared by the pages that carry a project/task booking form.

use crate::html::locator::{options, own_text, select_by_name, selected_option, value};
use crate::html::script::{TaskScript, project_task_ids};
use crate::html::{ElementRef, Html};
use crate::models::{Catalogue, ID_NONE, Project, ProjectTask};

/// What a booking form tells about projects and tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormCatalogue {
    pub catalogue: Catalogue,
    /// The project selected in the form, `ID_NONE` if none.
    pub project_id: i64,
    /// The task selected in the form, `ID_NONE` if none.
    pub task_id: i64,
    /// The project → task script was present on the page.
    pub associations_known: bool,
}

impl FormCatalogue {
    pub fn project_name(&self) -> String {
        self.catalogue
            .project(self.project_id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    pub fn task_name(&self) -> String {
        self.catalogue
            .task(self.task_id)
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }
}

/// Option value as an id; blank or garbage is `ID_NONE`.
pub fn option_id(option: ElementRef) -> i64 {
    value(option).trim().parse::<i64>().unwrap_or(ID_NONE)
}

/// Id of the option marked `selected`, `ID_NONE` when none is.
pub fn selected_id(select: ElementRef) -> i64 {
    selected_option(select).map(option_id).unwrap_or(ID_NONE)
}

/// Projects offered by the `project` select. Placeholder options without an
/// id are left out.
pub fn parse_project_options(select: ElementRef) -> Vec<Project> {
    options(select)
        .into_iter()
        .map(|o| Project::new(option_id(o), &own_text(o)))
        .filter(Project::has_identity)
        .collect()
}

/// Tasks offered by the `task` select.
pub fn parse_task_options(select: ElementRef) -> Vec<ProjectTask> {
    options(select)
        .into_iter()
        .map(|o| ProjectTask::new(option_id(o), &own_text(o)))
        .filter(ProjectTask::has_identity)
        .collect()
}

/// Read the project and task selects of `form` and attach the task ids
/// mined from the page's script. `None` when the form has no such selects.
pub fn parse_form_catalogue(doc: &Html, form: ElementRef, script: TaskScript) -> Option<FormCatalogue> {
    let input_projects = select_by_name(doc, form, "project")?;
    let input_tasks = select_by_name(doc, form, "task")?;

    let mut catalogue = Catalogue::new(
        parse_project_options(input_projects),
        parse_task_options(input_tasks),
    );

    let mined = project_task_ids(doc, script);
    let associations_known = mined.is_some();
    if let Some(pairs) = mined {
        catalogue.clear_assignments();
        for (project_id, task_ids) in pairs {
            if !catalogue.assign_tasks(project_id, &task_ids) {
                log::debug!("dropping tasks of unknown project {project_id}");
            }
        }
    }

    let project_id = selected_id(input_projects);
    let task_id = selected_id(input_tasks);

    Some(FormCatalogue {
        project_id: if catalogue.project(project_id).is_some() { project_id } else { ID_NONE },
        task_id: if catalogue.task(task_id).is_some() { task_id } else { ID_NONE },
        catalogue,
        associations_known,
    })
}
