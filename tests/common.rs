#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::PathBuf;
use url::Url;
use worktracker::db::initialize::init_db;
use worktracker::html::extract::EditTarget;
use worktracker::parser::ParseContext;

pub fn wt() -> Command {
    cargo_bin_cmd!("worktracker")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_worktracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Path of a saved page under tests/fixtures
pub fn fixture_path(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path.to_string_lossy().to_string()
}

pub fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture should exist")
}

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("valid test date")
}

pub fn edit_target() -> EditTarget {
    EditTarget::new(
        Url::parse("https://localhost/timetracker/").expect("valid base url"),
        "time_edit.php",
    )
}

/// Parser context for pages of `day` with an empty cached catalogue
pub fn context(day: &str) -> ParseContext {
    ParseContext::new(edit_target(), date(day))
}

/// A migrated private database
pub fn memory_db() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory database");
    init_db(&conn).expect("schema");
    conn
}

/// Initialize a DB file through the CLI
pub fn init_test_db(db_path: &str) {
    wt().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}
