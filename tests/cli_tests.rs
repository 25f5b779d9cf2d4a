use predicates::str::contains;

mod common;
use common::{fixture_path, init_test_db, setup_test_db, wt};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("init_creates_schema");

    wt().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    wt().args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Time records"))
        .stdout(contains("Project/task links"));
}

#[test]
fn test_sync_time_list_then_list_records() {
    let db_path = setup_test_db("sync_time_list");
    init_test_db(&db_path);

    wt().args([
        "--db",
        &db_path,
        "sync",
        "time-list",
        &fixture_path("time_list.html"),
    ])
    .assert()
    .success()
    .stdout(contains("time-list:"))
    .stdout(contains("records +2"));

    wt().args(["--db", &db_path, "list", "records", "--from", "2024-03-01"])
        .assert()
        .success()
        .stdout(contains("101"))
        .stdout(contains("Alpha"))
        .stdout(contains("Kickoff notes"));

    wt().args(["--db", &db_path, "list", "projects"])
        .assert()
        .success()
        .stdout(contains("Beta"));
}

#[test]
fn test_second_sync_reports_no_changes() {
    let db_path = setup_test_db("sync_twice");
    init_test_db(&db_path);

    let page = fixture_path("time_list.html");
    wt().args(["--db", &db_path, "sync", "time-list", &page])
        .assert()
        .success();

    wt().args(["--db", &db_path, "sync", "time-list", &page])
        .assert()
        .success()
        .stdout(contains("cache already up to date"));

    wt().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("(time-list)"))
        .stdout(contains("no changes"));
}

#[test]
fn test_sync_refuses_server_error_page() {
    let db_path = setup_test_db("sync_error_page");
    init_test_db(&db_path);

    let page = fixture_path("error.html");
    wt().args([
        "--db",
        &db_path,
        "sync",
        "time-list",
        &page,
        "--date",
        "2024-03-01",
    ])
    .assert()
    .failure()
    .stderr(contains("Server reported an error"))
    .stderr(contains("Incorrect date."));

    wt().args([
        "--db",
        &db_path,
        "sync",
        "time-list",
        &page,
        "--date",
        "2024-03-01",
        "--force",
    ])
    .assert()
    .success()
    .stdout(contains("reconciling anyway"));
}

#[test]
fn test_parse_report_as_json() {
    let db_path = setup_test_db("parse_report_json");

    wt().args([
        "--db",
        &db_path,
        "parse",
        "report",
        &fixture_path("report.html"),
        "--from",
        "2024-03-01",
        "--to",
        "2024-03-31",
        "--json",
    ])
    .assert()
    .success()
    .stdout(contains("\"kind\": \"report\""))
    .stdout(contains("\"project_name\": \"Retired\""))
    .stdout(contains("\"cost\": 1000.0"));

    // Parsing alone never creates the cache.
    assert!(!std::path::Path::new(&db_path).exists());
}

#[test]
fn test_parse_users_listing() {
    wt().args(["parse", "users", &fixture_path("users.html")])
        .assert()
        .success()
        .stdout(contains("Ann Smith"))
        .stdout(contains("User, Manager"));
}

#[test]
fn test_sync_report_and_list_cache() {
    let db_path = setup_test_db("sync_report");
    init_test_db(&db_path);

    wt().args([
        "--db",
        &db_path,
        "sync",
        "report",
        &fixture_path("report.html"),
        "--from",
        "2024-03-01",
        "--to",
        "2024-03-31",
    ])
    .assert()
    .success()
    .stdout(contains("report +2"));

    wt().args(["--db", &db_path, "list", "report"])
        .assert()
        .success()
        .stdout(contains("Retired"))
        .stdout(contains("Legacy"));
}

#[test]
fn test_invalid_date_argument() {
    let db_path = setup_test_db("invalid_date");
    init_test_db(&db_path);

    wt().args(["--db", &db_path, "list", "records", "--from", "yesterday"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_db_check_and_migrate() {
    let db_path = setup_test_db("db_check");
    init_test_db(&db_path);

    wt().args(["--db", &db_path, "db", "--migrate", "--check"])
        .assert()
        .success()
        .stdout(contains("Schema already up to date"))
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_config_print() {
    wt().args(["--test", "config", "--print"])
        .assert()
        .success()
        .stdout(contains("server_url"))
        .stdout(contains("edit_page"));
}
