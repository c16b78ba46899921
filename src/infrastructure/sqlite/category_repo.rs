use crate::domain::entities::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::error::DomainError;
use crate::domain::ports::category_repository::CategoryRepository;
use crate::infrastructure::sqlite::{
    format_timestamp, is_constraint_violation, lock, parse_timestamp, SharedConnection,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

const SELECT_COLS: &str = "id, name, description, created_at, updated_at";

pub struct SqliteCategoryRepo {
    conn: SharedConnection,
}

impl SqliteCategoryRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub(crate) fn row_to_category(row: &rusqlite::Row, offset: usize) -> Result<Category, rusqlite::Error> {
        let created_str: String = row.get(offset + 3)?;
        let updated_str: String = row.get(offset + 4)?;
        Ok(Category {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            created_at: parse_timestamp(offset + 3, &created_str)?,
            updated_at: parse_timestamp(offset + 4, &updated_str)?,
        })
    }

    fn fetch(conn: &Connection, id: i64) -> Result<Option<Category>, DomainError> {
        let sql = format!("SELECT {SELECT_COLS} FROM categories WHERE id = ?1");
        let category = conn
            .query_row(&sql, params![id], |row| Self::row_to_category(row, 0))
            .optional()?;
        Ok(category)
    }

    fn name_conflict(name: &str) -> DomainError {
        DomainError::Conflict(format!("Category with name '{name}' already exists"))
    }
}

impl CategoryRepository for SqliteCategoryRepo {
    fn create(&self, category: &NewCategory) -> Result<Category, DomainError> {
        let conn = lock(&self.conn)?;
        let now = format_timestamp(&Utc::now());
        conn.execute(
            "INSERT INTO categories (name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![category.name, category.description, now],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                Self::name_conflict(&category.name)
            } else {
                DomainError::Store(format!("Failed to add category: {e}"))
            }
        })?;
        let id = conn.last_insert_rowid();
        Self::fetch(&conn, id)?
            .ok_or_else(|| DomainError::Store(format!("Category {id} vanished after insert")))
    }

    fn get(&self, id: i64) -> Result<Option<Category>, DomainError> {
        let conn = lock(&self.conn)?;
        Self::fetch(&conn, id)
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        let conn = lock(&self.conn)?;
        let sql = format!("SELECT {SELECT_COLS} FROM categories WHERE name = ?1");
        let category = conn
            .query_row(&sql, params![name], |row| Self::row_to_category(row, 0))
            .optional()?;
        Ok(category)
    }

    fn list(&self) -> Result<Vec<Category>, DomainError> {
        let conn = lock(&self.conn)?;
        let sql = format!("SELECT {SELECT_COLS} FROM categories ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let categories = stmt
            .query_map([], |row| Self::row_to_category(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn update(&self, id: i64, update: &CategoryUpdate) -> Result<Option<Category>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut sql = String::from("UPDATE categories SET updated_at = ?1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> =
            vec![Box::new(format_timestamp(&Utc::now()))];

        if let Some(name) = &update.name {
            sql.push_str(&format!(", name = ?{}", param_values.len() + 1));
            param_values.push(Box::new(name.clone()));
        }
        if let Some(description) = &update.description {
            sql.push_str(&format!(", description = ?{}", param_values.len() + 1));
            param_values.push(Box::new(description.clone()));
        }
        sql.push_str(&format!(" WHERE id = ?{}", param_values.len() + 1));
        param_values.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_refs.as_slice()).map_err(|e| {
            if is_constraint_violation(&e) {
                Self::name_conflict(update.name.as_deref().unwrap_or_default())
            } else {
                DomainError::Store(format!("Failed to update category: {e}"))
            }
        })?;
        if rows == 0 {
            return Ok(None);
        }
        Self::fetch(&conn, id)
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        // FTS rows are not covered by the foreign key cascade.
        tx.execute(
            "DELETE FROM post_search WHERE rowid IN (SELECT id FROM posts WHERE category_id = ?1)",
            params![id],
        )?;
        let rows = tx
            .execute("DELETE FROM categories WHERE id = ?1", params![id])
            .map_err(|e| DomainError::Store(format!("Failed to delete category: {e}")))?;
        tx.commit()?;
        Ok(rows > 0)
    }
}
