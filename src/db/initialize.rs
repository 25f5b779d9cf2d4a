use crate::db::migrate::run_pending_migrations;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Bring the cache schema up to date. Tables are only ever created by
/// migrations.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    let applied =
        run_pending_migrations(conn).map_err(|e| AppError::Migration(e.to_string()))?;
    if applied > 0 {
        log::debug!("schema ready, {applied} migration(s) applied");
    }
    Ok(())
}
