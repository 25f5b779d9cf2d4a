use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    message: &'static str,
    sql: &'static str,
}

/// Schema steps in the order they must run. Each is applied once and marked
/// with a `migration_applied` row in `log`.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20261001_0001_create_catalogue",
        message: "Created project, project_task and project_task_key tables",
        sql: r#"
            CREATE TABLE IF NOT EXISTS project (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS project_task (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS project_task_key (
                project_id INTEGER NOT NULL,
                task_id    INTEGER NOT NULL,
                PRIMARY KEY (project_id, task_id)
            );

            CREATE INDEX IF NOT EXISTS idx_project_task_key_task ON project_task_key(task_id);
        "#,
    },
    Migration {
        version: "20261001_0002_create_time_record",
        message: "Created time_record table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS time_record (
                row_id       INTEGER PRIMARY KEY AUTOINCREMENT,
                id           INTEGER NOT NULL DEFAULT 0,
                project_id   INTEGER NOT NULL DEFAULT 0,
                project_name TEXT NOT NULL DEFAULT '',
                task_id      INTEGER NOT NULL DEFAULT 0,
                task_name    TEXT NOT NULL DEFAULT '',
                date         TEXT NOT NULL,
                start        TEXT,
                finish       TEXT,
                duration     INTEGER NOT NULL DEFAULT 0,
                note         TEXT NOT NULL DEFAULT '',
                cost         REAL NOT NULL DEFAULT 0,
                location     INTEGER NOT NULL DEFAULT 0,
                status       TEXT NOT NULL DEFAULT 'draft'
                    CHECK(status IN ('draft','current','modified','deleted')),
                version      INTEGER NOT NULL DEFAULT 0
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_time_record_id ON time_record(id) WHERE id <> 0;
            CREATE INDEX IF NOT EXISTS idx_time_record_date ON time_record(date);
            CREATE INDEX IF NOT EXISTS idx_time_record_project ON time_record(project_id);
            CREATE INDEX IF NOT EXISTS idx_time_record_task ON time_record(task_id);
        "#,
    },
    Migration {
        version: "20261001_0003_create_report",
        message: "Created report cache table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS report (
                row_id       INTEGER PRIMARY KEY AUTOINCREMENT,
                id           INTEGER NOT NULL DEFAULT 0,
                project_id   INTEGER NOT NULL DEFAULT 0,
                project_name TEXT NOT NULL DEFAULT '',
                task_id      INTEGER NOT NULL DEFAULT 0,
                task_name    TEXT NOT NULL DEFAULT '',
                date         TEXT NOT NULL,
                start        TEXT,
                finish       TEXT,
                duration     INTEGER NOT NULL DEFAULT 0,
                note         TEXT NOT NULL DEFAULT '',
                cost         REAL NOT NULL DEFAULT 0,
                location     INTEGER NOT NULL DEFAULT 0,
                status       TEXT NOT NULL DEFAULT 'current',
                version      INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_report_date ON report(date);
            CREATE INDEX IF NOT EXISTS idx_report_project ON report(project_id);
            CREATE INDEX IF NOT EXISTS idx_report_task ON report(task_id);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute_batch(migration.sql)?;
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [migration.version, migration.message],
    )?;
    Ok(())
}

/// Names of the migrations not yet applied to `conn`.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut pending = Vec::new();
    for migration in MIGRATIONS {
        if !is_applied(conn, migration.version)? {
            pending.push(migration.version);
        }
    }
    Ok(pending)
}

/// Public entry point: run all pending migrations.
///
/// Called by `db::initialize::init_db()`.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        if is_applied(conn, migration.version)? {
            continue;
        }
        apply(conn, migration)?;
        log::info!("migration {} applied", migration.version);
        success(format!("Migration applied: {}", migration.version));
        applied += 1;
    }

    Ok(applied)
}
