//! Projects and tasks held as owned collections keyed by id. Projects refer
//! to their tasks by id only, so a task shared by several projects is stored
//! once.

use super::{Project, ProjectTask, ProjectTaskKey};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalogue {
    pub projects: Vec<Project>,
    pub tasks: Vec<ProjectTask>,
}

impl Catalogue {
    pub fn new(projects: Vec<Project>, tasks: Vec<ProjectTask>) -> Self {
        Self { projects, tasks }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.tasks.is_empty()
    }

    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.has_identity() && p.id == id)
    }

    pub fn task(&self, id: i64) -> Option<&ProjectTask> {
        self.tasks.iter().find(|t| t.has_identity() && t.id == id)
    }

    /// Tasks of `project` in assignment order.
    pub fn tasks_of(&self, project: &Project) -> Vec<&ProjectTask> {
        project
            .task_ids
            .iter()
            .filter_map(|id| self.task(*id))
            .collect()
    }

    pub fn clear_assignments(&mut self) {
        for project in &mut self.projects {
            project.task_ids.clear();
        }
    }

    /// Attach every catalogue task listed in `task_ids` to the project.
    /// A task whose name the project already holds is skipped. Returns
    /// `false` when the project is not in the catalogue.
    pub fn assign_tasks(&mut self, project_id: i64, task_ids: &[i64]) -> bool {
        let names: HashMap<i64, &str> = self
            .tasks
            .iter()
            .filter(|t| t.has_identity())
            .map(|t| (t.id, t.name.as_str()))
            .collect();

        let Some(project) = self
            .projects
            .iter_mut()
            .find(|p| p.has_identity() && p.id == project_id)
        else {
            return false;
        };

        for task in self.tasks.iter().filter(|t| t.has_identity()) {
            if !task_ids.contains(&task.id) {
                continue;
            }
            let clash = project
                .task_ids
                .iter()
                .any(|held| *held == task.id || names.get(held) == Some(&task.name.as_str()));
            if !clash {
                project.task_ids.push(task.id);
            }
        }
        true
    }

    /// Project/task pairs between identified entities.
    pub fn keys(&self) -> Vec<ProjectTaskKey> {
        let mut keys = Vec::new();
        for project in self.projects.iter().filter(|p| p.has_identity()) {
            for task_id in &project.task_ids {
                if self.task(*task_id).is_some() {
                    keys.push(ProjectTaskKey::new(project.id, *task_id));
                }
            }
        }
        keys
    }

    /// Projects and tasks that carry a server id.
    pub fn identified(&self) -> (Vec<Project>, Vec<ProjectTask>) {
        (
            self.projects.iter().filter(|p| p.has_identity()).cloned().collect(),
            self.tasks.iter().filter(|t| t.has_identity()).cloned().collect(),
        )
    }

    /// Project shown as `name`, synthesized as a stand-in when unknown.
    pub fn resolve_project(&mut self, name: &str) -> &Project {
        match self.projects.iter().position(|p| p.name == name) {
            Some(index) => &self.projects[index],
            None => {
                log::debug!("synthesizing stand-in project {name:?}");
                self.projects.push(Project::stand_in(name));
                &self.projects[self.projects.len() - 1]
            }
        }
    }

    /// Task shown as `name` under the project with `project_id`. The project's
    /// own tasks are searched first, then the whole catalogue; a stand-in is
    /// synthesized when neither knows the name.
    pub fn resolve_task(&mut self, project_id: i64, name: &str) -> &ProjectTask {
        let own = self.project(project_id).and_then(|p| {
            p.task_ids
                .iter()
                .filter_map(|id| self.tasks.iter().position(|t| t.has_identity() && t.id == *id))
                .find(|index| self.tasks[*index].name == name)
        });

        let index = match own.or_else(|| self.tasks.iter().position(|t| t.name == name)) {
            Some(index) => index,
            None => {
                log::debug!("synthesizing stand-in task {name:?}");
                self.tasks.push(ProjectTask::stand_in(name));
                self.tasks.len() - 1
            }
        };
        &self.tasks[index]
    }
}
