use crate::domain::entities::post::{NewPost, Post, PostUpdate};
use crate::domain::error::DomainError;
use crate::domain::ports::category_repository::CategoryRepository;
use crate::domain::ports::post_repository::PostRepository;
use std::sync::Arc;

pub struct PostUseCase {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl PostUseCase {
    pub fn new(posts: Arc<dyn PostRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self { posts, categories }
    }

    pub fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        if post.content.is_empty() {
            return Err("Post content must not be empty".into());
        }
        self.ensure_category(post.category_id)?;
        let created = self.posts.create(&post)?;
        tracing::debug!(post_id = created.id, category_id = created.category_id, "post created");
        Ok(created)
    }

    /// The post with its category loaded.
    pub fn get(&self, id: i64) -> Result<Post, DomainError> {
        self.posts.get(id, true)?.ok_or_else(|| not_found(id))
    }

    pub fn update(&self, id: i64, update: PostUpdate) -> Result<Post, DomainError> {
        if self.posts.get(id, false)?.is_none() {
            return Err(not_found(id));
        }
        if let Some(category_id) = update.category_id {
            self.ensure_category(category_id)?;
        }
        if update.content.as_deref() == Some("") {
            return Err("Post content must not be empty".into());
        }
        self.posts.update(id, &update)?.ok_or_else(|| not_found(id))
    }

    pub fn delete(&self, id: i64) -> Result<(), DomainError> {
        if !self.posts.delete(id)? {
            return Err(not_found(id));
        }
        Ok(())
    }

    fn ensure_category(&self, category_id: i64) -> Result<(), DomainError> {
        if self.categories.get(category_id)?.is_none() {
            return Err(DomainError::NotFound(format!(
                "Category with id {category_id} not found"
            )));
        }
        Ok(())
    }
}

fn not_found(id: i64) -> DomainError {
    DomainError::NotFound(format!("Post with id {id} not found"))
}
