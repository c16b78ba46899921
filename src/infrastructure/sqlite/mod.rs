pub mod analysis_repo;
pub mod category_repo;
pub mod migrations;
pub mod post_repo;

use crate::domain::error::DomainError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// One connection shared by every repository, so all of them see the same
/// database (including `:memory:`) and writes are serialized.
pub type SharedConnection = Arc<Mutex<Connection>>;

pub fn open_connection(db_path: &str) -> Result<SharedConnection, DomainError> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Store(format!("DB error: {e}")))?;
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))
        .map_err(|e| DomainError::Store(format!("WAL error: {e}")))?;
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| DomainError::Store(format!("Foreign key pragma error: {e}")))?;
    register_functions(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// SQLite's built-in `lower()` only folds ASCII.
fn register_functions(conn: &Connection) -> Result<(), DomainError> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
    .map_err(|e| DomainError::Store(format!("Failed to register unicode_lower: {e}")))
}

pub(crate) fn lock(conn: &SharedConnection) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
    conn.lock().map_err(|e| DomainError::Store(e.to_string()))
}

/// Fixed-width so that text ordering matches time ordering.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(idx: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
