use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            title TEXT,
            content TEXT NOT NULL,
            search_document TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE VIRTUAL TABLE IF NOT EXISTS post_search USING fts5(
            document,
            tokenize = 'porter unicode61 remove_diacritics 2'
        );

        CREATE TABLE IF NOT EXISTS post_analyses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            analysis_kind TEXT NOT NULL
                CHECK (analysis_kind IN ('word_frequency', 'text_stats', 'tags')),
            result TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_posts_category ON posts(category_id);
        CREATE INDEX IF NOT EXISTS idx_analyses_post_kind
            ON post_analyses(post_id, analysis_kind, created_at);
        ",
    )
    .map_err(|e| DomainError::Store(format!("Migration failed: {e}")))?;
    tracing::debug!("schema ready");
    Ok(())
}
