use crate::application::filter::FilterCompiler;
use crate::domain::entities::post::Post;
use crate::domain::error::DomainError;
use crate::domain::ports::post_repository::PostRepository;
use crate::domain::values::page::Page;
use crate::domain::values::post_filter::PostFilter;
use std::sync::Arc;

pub struct QueryPostsUseCase {
    repo: Arc<dyn PostRepository>,
    compiler: Arc<FilterCompiler>,
}

impl QueryPostsUseCase {
    pub fn new(repo: Arc<dyn PostRepository>, compiler: Arc<FilterCompiler>) -> Self {
        Self { repo, compiler }
    }

    pub fn execute(&self, filter: &PostFilter) -> Result<Page<Post>, DomainError> {
        filter.validate()?;
        let query = self.compiler.compile(filter);
        let total = self.repo.count(&query.predicates)?;
        let items = self.repo.list(&query.predicates, query.offset, query.limit)?;
        Ok(Page::new(items, total, query.limit, query.offset))
    }
}
