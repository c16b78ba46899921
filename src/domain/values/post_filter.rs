use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};

pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 100;
pub const DEFAULT_LIMIT: usize = 10;

/// Filter and pagination parameters for listing posts.
///
/// All predicates are optional and combine with AND. An empty
/// `search_query` is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFilter {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default = "default_use_fulltext")]
    pub use_fulltext: bool,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_use_fulltext() -> bool {
    true
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            category_id: None,
            category_name: None,
            search_query: None,
            use_fulltext: true,
        }
    }
}

impl PostFilter {
    pub fn page(limit: usize, offset: usize) -> Self {
        Self {
            limit,
            offset,
            ..Self::default()
        }
    }

    pub fn with_category_id(mut self, id: i64) -> Self {
        self.category_id = Some(id);
        self
    }

    pub fn with_category_name(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    pub fn with_search(mut self, query: impl Into<String>, use_fulltext: bool) -> Self {
        self.search_query = Some(query.into());
        self.use_fulltext = use_fulltext;
        self
    }

    /// The search text, if it is set and non-empty.
    pub fn search_text(&self) -> Option<&str> {
        self.search_query.as_deref().filter(|q| !q.is_empty())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&self.limit) {
            return Err(DomainError::Validation(format!(
                "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {}",
                self.limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let filter = PostFilter::default();
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.offset, 0);
        assert!(filter.use_fulltext);
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_limit_bounds() {
        assert!(PostFilter::page(1, 0).validate().is_ok());
        assert!(PostFilter::page(100, 0).validate().is_ok());
        assert!(PostFilter::page(0, 0).validate().is_err());
        assert!(PostFilter::page(101, 0).validate().is_err());
    }

    #[test]
    fn test_empty_search_is_absent() {
        let filter = PostFilter::default().with_search("", true);
        assert_eq!(filter.search_text(), None);
        let filter = PostFilter::default().with_search("rust", false);
        assert_eq!(filter.search_text(), Some("rust"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let filter: PostFilter = serde_json::from_str(r#"{"category_id": 3}"#).unwrap();
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.category_id, Some(3));
        assert!(filter.use_fulltext);
    }
}
