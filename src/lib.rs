pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::analysis_cache::AnalysisCache;
use crate::application::analyzer::TextAnalyzer;
use crate::application::batch_analysis::{BatchAnalysisCoordinator, BatchAnalysisReport, MergedBatchReport};
use crate::application::categories::CategoryUseCase;
use crate::application::filter::FilterCompiler;
use crate::application::posts::PostUseCase;
use crate::application::query::QueryPostsUseCase;
use crate::config::AppConfig;
use crate::domain::entities::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::entities::post::{NewPost, Post, PostUpdate};
use crate::domain::entities::post_analysis::PostAnalysis;
use crate::domain::error::DomainError;
use crate::domain::ports::analysis_repository::AnalysisRepository;
use crate::domain::ports::category_repository::CategoryRepository;
use crate::domain::ports::post_repository::PostRepository;
use crate::domain::ports::tokenizer::Tokenizer;
use crate::domain::values::analysis_kind::AnalysisKind;
use crate::domain::values::analysis_report::{AnalysisOutput, PostAnalysisResult};
use crate::domain::values::page::Page;
use crate::domain::values::post_filter::PostFilter;
use crate::infrastructure::sqlite::analysis_repo::SqliteAnalysisRepo;
use crate::infrastructure::sqlite::category_repo::SqliteCategoryRepo;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::post_repo::SqlitePostRepo;
use crate::infrastructure::sqlite::{lock, open_connection};
use crate::infrastructure::tokenizer::UnicodeTokenizer;
use std::sync::Arc;

pub struct PostLens {
    categories_uc: CategoryUseCase,
    posts_uc: PostUseCase,
    query_uc: QueryPostsUseCase,
    analyzer: Arc<TextAnalyzer>,
    cache: Arc<AnalysisCache>,
    batch: BatchAnalysisCoordinator,
}

impl PostLens {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        Self::with_tokenizer(config, Arc::new(UnicodeTokenizer::new()))
    }

    pub fn with_tokenizer(config: &AppConfig, tokenizer: Arc<dyn Tokenizer>) -> Result<Self, DomainError> {
        config.validate()?;
        let languages = config.languages()?;

        let conn = open_connection(&config.database.path)?;
        run_migrations(&*lock(&conn)?)?;
        tracing::debug!(path = %config.database.path, "database opened");

        let category_repo: Arc<dyn CategoryRepository> = Arc::new(SqliteCategoryRepo::new(conn.clone()));
        let post_repo: Arc<dyn PostRepository> = Arc::new(SqlitePostRepo::new(conn.clone(), tokenizer.clone(), languages.clone()));
        let analysis_repo: Arc<dyn AnalysisRepository> = Arc::new(SqliteAnalysisRepo::new(conn));

        let compiler = Arc::new(FilterCompiler::new(tokenizer.clone(), languages.clone()));
        let analyzer = Arc::new(TextAnalyzer::new(tokenizer, languages));
        let cache = Arc::new(AnalysisCache::new(analysis_repo));

        Ok(Self {
            categories_uc: CategoryUseCase::new(category_repo.clone()),
            posts_uc: PostUseCase::new(post_repo.clone(), category_repo),
            query_uc: QueryPostsUseCase::new(post_repo.clone(), compiler.clone()),
            batch: BatchAnalysisCoordinator::new(
                post_repo,
                analyzer.clone(),
                cache.clone(),
                compiler,
                config.analysis.max_workers,
            ),
            analyzer,
            cache,
        })
    }

    // Categories
    pub fn create_category(&self, category: NewCategory) -> Result<Category, DomainError> {
        self.categories_uc.create(category)
    }

    pub fn get_category(&self, id: i64) -> Result<Category, DomainError> {
        self.categories_uc.get(id)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.categories_uc.list()
    }

    pub fn update_category(&self, id: i64, update: CategoryUpdate) -> Result<Category, DomainError> {
        self.categories_uc.update(id, update)
    }

    pub fn delete_category(&self, id: i64) -> Result<(), DomainError> {
        self.categories_uc.delete(id)
    }

    // Posts
    pub fn create_post(&self, post: NewPost) -> Result<Post, DomainError> {
        self.posts_uc.create(post)
    }

    pub fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts_uc.get(id)
    }

    pub fn update_post(&self, id: i64, update: PostUpdate) -> Result<Post, DomainError> {
        self.posts_uc.update(id, update)
    }

    pub fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        self.posts_uc.delete(id)
    }

    pub fn list_posts(&self, filter: &PostFilter) -> Result<Page<Post>, DomainError> {
        self.query_uc.execute(filter)
    }

    // Analysis
    /// Analyses arbitrary text without touching the store.
    pub fn analyze_text(&self, content: &str, kinds: &[AnalysisKind]) -> std::collections::BTreeMap<AnalysisKind, AnalysisOutput> {
        self.analyzer.analyze(content, kinds)
    }

    pub fn get_analysis(&self, post_id: i64, run_if_missing: bool) -> Result<PostAnalysisResult, DomainError> {
        self.batch.get_or_compute(post_id, run_if_missing)
    }

    pub fn record_analysis(&self, post_id: i64, output: &AnalysisOutput) -> Result<PostAnalysis, DomainError> {
        self.posts_uc.get(post_id)?;
        self.cache.record(post_id, output)
    }

    /// Stores a payload produced elsewhere under a kind given by name.
    pub fn record_raw_analysis(&self, post_id: i64, kind: &str, payload: &serde_json::Value) -> Result<PostAnalysis, DomainError> {
        self.posts_uc.get(post_id)?;
        self.cache.record_raw(post_id, kind, payload.to_string())
    }

    pub fn latest_analysis(&self, post_id: i64, kind: AnalysisKind) -> Result<Option<PostAnalysis>, DomainError> {
        self.cache.latest(post_id, kind)
    }

    pub fn analysis_history(&self, post_id: i64, kind: Option<AnalysisKind>) -> Result<Vec<PostAnalysis>, DomainError> {
        self.cache.history(post_id, kind)
    }

    pub async fn analyze_batch<S: AsRef<str>>(
        &self,
        filter: &PostFilter,
        kinds: &[S],
        persist: bool,
    ) -> Result<BatchAnalysisReport, DomainError> {
        self.batch.analyze_filtered_set(filter, kinds, persist).await
    }

    pub async fn analyze_batch_merged<S: AsRef<str>>(
        &self,
        filter: &PostFilter,
        kinds: &[S],
        persist: bool,
    ) -> Result<MergedBatchReport, DomainError> {
        self.batch.analyze_filtered_merged(filter, kinds, persist).await
    }
}
