use crate::domain::entities::post::{NewPost, Post, PostUpdate};
use crate::domain::error::DomainError;

/// A single restriction on the set of posts. A predicate list is a
/// conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostPredicate {
    CategoryId(i64),
    /// Exact match on the owning category's name.
    CategoryName(String),
    /// FTS5 match expression over the derived search document.
    FullText(String),
    /// Lower-cased needle matched case-insensitively against content or title.
    Substring(String),
    /// Matches no post.
    MatchNone,
}

pub trait PostRepository: Send + Sync {
    /// Inserts the post and indexes its search document in one transaction.
    fn create(&self, post: &NewPost) -> Result<Post, DomainError>;
    fn get(&self, id: i64, load_category: bool) -> Result<Option<Post>, DomainError>;
    /// Re-indexes the search document when title or content is set.
    fn update(&self, id: i64, update: &PostUpdate) -> Result<Option<Post>, DomainError>;
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
    fn count(&self, predicates: &[PostPredicate]) -> Result<usize, DomainError>;
    /// Posts in insertion order, with their categories loaded.
    fn list(
        &self,
        predicates: &[PostPredicate],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Post>, DomainError>;
}
