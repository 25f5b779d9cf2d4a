//! Admin listings: projects, tasks and users. These tables carry names but
//! no server ids.

use crate::html::extract::is_header_row;
use crate::html::locator::{cells, find_error, find_table, own_text, rows, selector};
use crate::html::{ElementRef, Html};
use crate::models::{Project, ProjectTask, ProjectsPage, TasksPage, User, UsersPage};

const NAME_DESCRIPTION: [&str; 2] = ["Name", "Description"];
const NAME_LOGIN: [&str; 2] = ["Name", "Login"];

/// Data rows of the first table headed by `labels`, as cell lists.
fn data_rows<'a>(doc: &'a Html, labels: &[&str]) -> Vec<Vec<ElementRef<'a>>> {
    let Some(table) = find_table(doc.root_element(), labels) else {
        return Vec::new();
    };
    rows(table)
        .into_iter()
        .filter(|row| !is_header_row(*row))
        .map(cells)
        .filter(|c| !c.is_empty())
        .collect()
}

fn name_and_description(row: &[ElementRef]) -> (String, String) {
    let name = row.first().map(|c| own_text(*c)).unwrap_or_default();
    let description = row.get(1).map(|c| own_text(*c)).unwrap_or_default();
    (name, description)
}

pub fn parse_projects(html: &str) -> ProjectsPage {
    let doc = Html::parse_document(html);
    let projects = data_rows(&doc, &NAME_DESCRIPTION)
        .iter()
        .map(|row| {
            let (name, description) = name_and_description(row);
            let mut project = Project::stand_in(&name);
            project.description = description;
            project
        })
        .collect();

    ProjectsPage {
        projects,
        error_message: find_error(&doc),
    }
}

pub fn parse_tasks(html: &str) -> TasksPage {
    let doc = Html::parse_document(html);
    let tasks = data_rows(&doc, &NAME_DESCRIPTION)
        .iter()
        .map(|row| {
            let (name, description) = name_and_description(row);
            let mut task = ProjectTask::stand_in(&name);
            task.description = description;
            task
        })
        .collect();

    TasksPage {
        tasks,
        error_message: find_error(&doc),
    }
}

/// Users are numbered from 1 in table order.
pub fn parse_users(html: &str) -> UsersPage {
    let doc = Html::parse_document(html);
    let users = data_rows(&doc, &NAME_LOGIN)
        .iter()
        .enumerate()
        .map(|(index, row)| parse_user(index as i64 + 1, row))
        .collect();

    UsersPage {
        users,
        error_message: find_error(&doc),
    }
}

fn parse_user(id: i64, row: &[ElementRef]) -> User {
    let (display_name, login) = name_and_description(row);

    let uncompleted_entry = match (row.first(), selector("span.uncompleted-entry.active")) {
        (Some(cell), Some(sel)) => cell.select(&sel).next().is_some(),
        _ => false,
    };

    let roles = row
        .get(2)
        .map(|c| own_text(*c))
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();

    User {
        id,
        login,
        display_name,
        roles,
        uncompleted_entry,
    }
}
