use crate::domain::entities::post::{NewPost, Post, PostUpdate};
use crate::domain::error::DomainError;
use crate::domain::ports::post_repository::{PostPredicate, PostRepository};
use crate::domain::ports::tokenizer::Tokenizer;
use crate::domain::values::language::LanguageSet;
use crate::infrastructure::sqlite::category_repo::SqliteCategoryRepo;
use crate::infrastructure::sqlite::{format_timestamp, lock, parse_timestamp, SharedConnection};
use chrono::Utc;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

const POST_COLS: &str =
    "p.id, p.category_id, p.title, p.content, p.search_document, p.created_at, p.updated_at";
const CATEGORY_COLS: &str = "c.id, c.name, c.description, c.created_at, c.updated_at";
const POST_COL_COUNT: usize = 7;

pub struct SqlitePostRepo {
    conn: SharedConnection,
    tokenizer: Arc<dyn Tokenizer>,
    languages: LanguageSet,
}

impl SqlitePostRepo {
    /// `tokenizer` and `languages` must be the ones the filter compiler uses,
    /// so indexed words and query terms are stemmed alike.
    pub fn new(conn: SharedConnection, tokenizer: Arc<dyn Tokenizer>, languages: LanguageSet) -> Self {
        Self {
            conn,
            tokenizer,
            languages,
        }
    }

    fn row_to_post(row: &rusqlite::Row) -> Result<Post, rusqlite::Error> {
        let created_str: String = row.get(5)?;
        let updated_str: String = row.get(6)?;
        Ok(Post {
            id: row.get(0)?,
            category_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            search_document: row.get(4)?,
            created_at: parse_timestamp(5, &created_str)?,
            updated_at: parse_timestamp(6, &updated_str)?,
            category: None,
        })
    }

    fn row_to_post_with_category(row: &rusqlite::Row) -> Result<Post, rusqlite::Error> {
        let mut post = Self::row_to_post(row)?;
        post.category = Some(SqliteCategoryRepo::row_to_category(row, POST_COL_COUNT)?);
        Ok(post)
    }

    fn fetch(conn: &Connection, id: i64, load_category: bool) -> Result<Option<Post>, DomainError> {
        let post = if load_category {
            let sql = format!(
                "SELECT {POST_COLS}, {CATEGORY_COLS} FROM posts p JOIN categories c ON c.id = p.category_id WHERE p.id = ?1"
            );
            conn.query_row(&sql, params![id], Self::row_to_post_with_category)
                .optional()?
        } else {
            let sql = format!("SELECT {POST_COLS} FROM posts p WHERE p.id = ?1");
            conn.query_row(&sql, params![id], Self::row_to_post).optional()?
        };
        Ok(post)
    }

    /// Document words with those the index cannot stem pre-stemmed.
    fn index_form(&self, document: &str) -> String {
        self.tokenizer
            .search_words(document)
            .iter()
            .map(|w| self.tokenizer.search_stem(w, &self.languages))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn index_document(&self, conn: &Connection, id: i64, document: &str) -> Result<(), rusqlite::Error> {
        conn.execute("DELETE FROM post_search WHERE rowid = ?1", params![id])?;
        conn.execute(
            "INSERT INTO post_search (rowid, document) VALUES (?1, ?2)",
            params![id, self.index_form(document)],
        )?;
        Ok(())
    }

    /// Appends one `AND` clause per predicate, numbering parameters after the
    /// ones already bound.
    fn push_predicates(
        sql: &mut String,
        param_values: &mut Vec<Box<dyn ToSql>>,
        predicates: &[PostPredicate],
    ) {
        for predicate in predicates {
            let n = param_values.len() + 1;
            match predicate {
                PostPredicate::CategoryId(id) => {
                    sql.push_str(&format!(" AND p.category_id = ?{n}"));
                    param_values.push(Box::new(*id));
                }
                PostPredicate::CategoryName(name) => {
                    sql.push_str(&format!(" AND c.name = ?{n}"));
                    param_values.push(Box::new(name.clone()));
                }
                PostPredicate::FullText(expression) => {
                    sql.push_str(&format!(
                        " AND p.id IN (SELECT rowid FROM post_search WHERE post_search MATCH ?{n})"
                    ));
                    param_values.push(Box::new(expression.clone()));
                }
                PostPredicate::Substring(needle) => {
                    sql.push_str(&format!(
                        " AND (instr(unicode_lower(p.content), ?{n}) > 0 OR instr(unicode_lower(COALESCE(p.title, '')), ?{n}) > 0)"
                    ));
                    param_values.push(Box::new(needle.clone()));
                }
                PostPredicate::MatchNone => sql.push_str(" AND 0"),
            }
        }
    }
}

impl PostRepository for SqlitePostRepo {
    fn create(&self, post: &NewPost) -> Result<Post, DomainError> {
        let mut conn = lock(&self.conn)?;
        let now = format_timestamp(&Utc::now());
        let document = Post::search_document(post.title.as_deref(), &post.content);

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO posts (category_id, title, content, search_document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![post.category_id, post.title, post.content, document, now],
        )
        .map_err(|e| DomainError::Store(format!("Failed to add post: {e}")))?;
        let id = tx.last_insert_rowid();
        self.index_document(&tx, id, &document)?;
        tx.commit()?;

        Self::fetch(&conn, id, true)?
            .ok_or_else(|| DomainError::Store(format!("Post {id} vanished after insert")))
    }

    fn get(&self, id: i64, load_category: bool) -> Result<Option<Post>, DomainError> {
        let conn = lock(&self.conn)?;
        Self::fetch(&conn, id, load_category)
    }

    fn update(&self, id: i64, update: &PostUpdate) -> Result<Option<Post>, DomainError> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        let Some(mut post) = Self::fetch(&tx, id, false)? else {
            return Ok(None);
        };

        if let Some(category_id) = update.category_id {
            post.category_id = category_id;
        }
        if let Some(title) = &update.title {
            post.title = title.clone();
        }
        if let Some(content) = &update.content {
            post.content = content.clone();
        }
        if update.touches_search_document() {
            post.search_document = Post::search_document(post.title.as_deref(), &post.content);
            self.index_document(&tx, id, &post.search_document)?;
        }

        tx.execute(
            "UPDATE posts SET category_id = ?1, title = ?2, content = ?3, search_document = ?4, updated_at = ?5 WHERE id = ?6",
            params![
                post.category_id,
                post.title,
                post.content,
                post.search_document,
                format_timestamp(&Utc::now()),
                id,
            ],
        )
        .map_err(|e| DomainError::Store(format!("Failed to update post: {e}")))?;
        tx.commit()?;

        Self::fetch(&conn, id, true)
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM post_search WHERE rowid = ?1", params![id])?;
        let rows = tx
            .execute("DELETE FROM posts WHERE id = ?1", params![id])
            .map_err(|e| DomainError::Store(format!("Failed to delete post: {e}")))?;
        tx.commit()?;
        Ok(rows > 0)
    }

    fn count(&self, predicates: &[PostPredicate]) -> Result<usize, DomainError> {
        let conn = lock(&self.conn)?;
        let mut sql = String::from(
            "SELECT COUNT(*) FROM posts p JOIN categories c ON c.id = p.category_id WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();
        Self::push_predicates(&mut sql, &mut param_values, predicates);

        let params_refs: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let total: i64 = conn.query_row(&sql, params_refs.as_slice(), |r| r.get(0))?;
        Ok(total as usize)
    }

    fn list(
        &self,
        predicates: &[PostPredicate],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Post>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut sql = format!(
            "SELECT {POST_COLS}, {CATEGORY_COLS} FROM posts p JOIN categories c ON c.id = p.category_id WHERE 1=1"
        );
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();
        Self::push_predicates(&mut sql, &mut param_values, predicates);

        sql.push_str(&format!(
            " ORDER BY p.id LIMIT ?{} OFFSET ?{}",
            param_values.len() + 1,
            param_values.len() + 2
        ));
        param_values.push(Box::new(limit as i64));
        param_values.push(Box::new(offset as i64));

        let params_refs: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let posts = stmt
            .query_map(params_refs.as_slice(), Self::row_to_post_with_category)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }
}
