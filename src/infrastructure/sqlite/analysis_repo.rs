use crate::domain::entities::post_analysis::{NewPostAnalysis, PostAnalysis};
use crate::domain::error::DomainError;
use crate::domain::ports::analysis_repository::AnalysisRepository;
use crate::domain::values::analysis_kind::AnalysisKind;
use crate::infrastructure::sqlite::{format_timestamp, lock, parse_timestamp, SharedConnection};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

const SELECT_COLS: &str = "id, post_id, analysis_kind, result, created_at, updated_at";

pub struct SqliteAnalysisRepo {
    conn: SharedConnection,
}

impl SqliteAnalysisRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn row_to_analysis(row: &rusqlite::Row) -> Result<PostAnalysis, rusqlite::Error> {
        let kind_str: String = row.get(2)?;
        let created_str: String = row.get(4)?;
        let updated_str: String = row.get(5)?;
        Ok(PostAnalysis {
            id: row.get(0)?,
            post_id: row.get(1)?,
            kind: kind_str
                .parse::<AnalysisKind>()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
            result: row.get(3)?,
            created_at: parse_timestamp(4, &created_str)?,
            updated_at: parse_timestamp(5, &updated_str)?,
        })
    }

    fn insert(conn: &Connection, analysis: &NewPostAnalysis) -> Result<PostAnalysis, DomainError> {
        let now = Utc::now();
        let stamp = format_timestamp(&now);
        conn.execute(
            "INSERT INTO post_analyses (post_id, analysis_kind, result, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![analysis.post_id, analysis.kind.as_str(), analysis.result, stamp],
        )
        .map_err(|e| DomainError::Store(format!("Failed to add analysis: {e}")))?;
        let id = conn.last_insert_rowid();
        let sql = format!("SELECT {SELECT_COLS} FROM post_analyses WHERE id = ?1");
        let stored = conn.query_row(&sql, params![id], Self::row_to_analysis)?;
        Ok(stored)
    }
}

impl AnalysisRepository for SqliteAnalysisRepo {
    fn add(&self, analysis: &NewPostAnalysis) -> Result<PostAnalysis, DomainError> {
        let conn = lock(&self.conn)?;
        Self::insert(&conn, analysis)
    }

    fn add_all(&self, analyses: &[NewPostAnalysis]) -> Result<Vec<PostAnalysis>, DomainError> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        let stored = analyses
            .iter()
            .map(|a| Self::insert(&tx, a))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit()?;
        Ok(stored)
    }

    fn list(&self, post_id: i64, kind: Option<AnalysisKind>) -> Result<Vec<PostAnalysis>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut sql = format!("SELECT {SELECT_COLS} FROM post_analyses WHERE post_id = ?1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(post_id)];
        if let Some(kind) = kind {
            sql.push_str(" AND analysis_kind = ?2");
            param_values.push(Box::new(kind.as_str()));
        }
        sql.push_str(" ORDER BY created_at, id");

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let analyses = stmt
            .query_map(params_refs.as_slice(), Self::row_to_analysis)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(analyses)
    }

    fn latest(&self, post_id: i64, kind: AnalysisKind) -> Result<Option<PostAnalysis>, DomainError> {
        let conn = lock(&self.conn)?;
        let sql = format!(
            "SELECT {SELECT_COLS} FROM post_analyses WHERE post_id = ?1 AND analysis_kind = ?2
             ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let analysis = conn
            .query_row(&sql, params![post_id, kind.as_str()], Self::row_to_analysis)
            .optional()?;
        Ok(analysis)
    }
}
