use crate::domain::entities::category::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub category_id: i64,
    pub title: Option<String>,
    pub content: String,
    /// Derived from title and content on every write that touches either.
    #[serde(skip_serializing)]
    pub search_document: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Post {
    /// Text indexed for full-text search.
    pub fn search_document(title: Option<&str>, content: &str) -> String {
        format!("{} {}", title.unwrap_or(""), content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub category_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
}

impl NewPost {
    pub fn new(category_id: i64, title: Option<&str>, content: impl Into<String>) -> Self {
        Self {
            category_id,
            title: title.map(String::from),
            content: content.into(),
        }
    }
}

/// Partial update; `None` leaves the field untouched. `title: Some(None)`
/// clears the title, which JSON spells as `"title": null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default)]
    pub content: Option<String>,
}

impl PostUpdate {
    pub fn touches_search_document(&self) -> bool {
        self.title.is_some() || self.content.is_some()
    }
}

/// A field that is present, even as `null`, deserializes to `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
