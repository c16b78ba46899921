use crate::application::analysis_cache::AnalysisCache;
use crate::application::analyzer::TextAnalyzer;
use crate::application::filter::FilterCompiler;
use crate::domain::entities::post::Post;
use crate::domain::entities::post_analysis::PostAnalysis;
use crate::domain::error::DomainError;
use crate::domain::ports::post_repository::PostRepository;
use crate::domain::values::analysis_kind::AnalysisKind;
use crate::domain::values::analysis_report::{
    AnalysisOutput, ExtractedTags, PostAnalysisResult, TagsReport, TextStats, WordFrequencyReport,
};
use crate::domain::values::post_filter::PostFilter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEFAULT_MAX_WORKERS: usize = 4;

/// What happened to one post of a batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PostAnalysisOutcome {
    Completed {
        post_id: i64,
        analyses: BTreeMap<AnalysisKind, AnalysisOutput>,
    },
    Failed {
        post_id: i64,
        error: String,
    },
}

impl PostAnalysisOutcome {
    pub fn post_id(&self) -> i64 {
        match self {
            PostAnalysisOutcome::Completed { post_id, .. } | PostAnalysisOutcome::Failed { post_id, .. } => *post_id,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PostAnalysisOutcome::Completed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchMetadata {
    pub run_id: Uuid,
    /// Posts matching the filter, ignoring pagination.
    pub total_posts: usize,
    /// Posts on the analysed page.
    pub processed_posts: usize,
    pub failed_posts: usize,
    pub kinds: Vec<AnalysisKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchAnalysisReport {
    pub results: Vec<PostAnalysisOutcome>,
    pub metadata: BatchMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergedBatchReport {
    pub results: Vec<PostAnalysisResult>,
    pub metadata: BatchMetadata,
}

#[derive(Clone)]
pub struct BatchAnalysisCoordinator {
    posts: Arc<dyn PostRepository>,
    analyzer: Arc<TextAnalyzer>,
    cache: Arc<AnalysisCache>,
    compiler: Arc<FilterCompiler>,
    max_workers: usize,
}

impl BatchAnalysisCoordinator {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        analyzer: Arc<TextAnalyzer>,
        cache: Arc<AnalysisCache>,
        compiler: Arc<FilterCompiler>,
        max_workers: usize,
    ) -> Self {
        Self {
            posts,
            analyzer,
            cache,
            compiler,
            max_workers: max_workers.max(1),
        }
    }

    /// Merged latest analyses of a post. With `run_if_missing`, kinds that
    /// have never been computed are computed and stored first, all in one
    /// transaction; kinds already stored are never recomputed here.
    pub fn get_or_compute(&self, post_id: i64, run_if_missing: bool) -> Result<PostAnalysisResult, DomainError> {
        let post = self.find_post(post_id)?;
        let mut latest = self.latest_rows(post_id)?;

        if run_if_missing {
            let missing: Vec<AnalysisKind> = AnalysisKind::ALL
                .iter()
                .copied()
                .filter(|kind| !latest.contains_key(kind))
                .collect();
            if !missing.is_empty() {
                let outputs = self.analyzer.analyze(&post.content, &missing);
                let stored = self.cache.record_all(post_id, outputs.values())?;
                debug!(post_id, filled = stored.len(), "analysis cache filled");
                latest = self.latest_rows(post_id)?;
            }
        }

        assemble(post_id, &latest)
    }

    /// Recomputes every requested kind for each post on the filtered page,
    /// at most `max_workers` posts at a time. Results follow page order; a
    /// failing post is reported without affecting the others.
    pub async fn analyze_filtered_set<S: AsRef<str>>(
        &self,
        filter: &PostFilter,
        kinds: &[S],
        persist: bool,
    ) -> Result<BatchAnalysisReport, DomainError> {
        let kinds = AnalysisKind::parse_all(kinds)?;
        filter.validate()?;

        let query = self.compiler.compile(filter);
        let repo = Arc::clone(&self.posts);
        let (total_posts, posts) = tokio::task::spawn_blocking(move || {
            let total = repo.count(&query.predicates)?;
            let page = repo.list(&query.predicates, query.offset, query.limit)?;
            Ok::<_, DomainError>((total, page))
        })
        .await
        .map_err(|e| DomainError::Store(format!("Post query task failed: {e}")))??;

        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            total_posts,
            page = posts.len(),
            max_workers = self.max_workers,
            persist,
            "batch analysis started"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut handles = Vec::with_capacity(posts.len());
        for post in posts {
            let post_id = post.id;
            let semaphore = Arc::clone(&semaphore);
            let analyzer = Arc::clone(&self.analyzer);
            let cache = Arc::clone(&self.cache);
            let kinds = kinds.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| DomainError::Store(format!("Worker pool closed: {e}")))?;
                tokio::task::spawn_blocking(move || analyze_post(&analyzer, &cache, &post, &kinds, persist))
                    .await
                    .map_err(|e| DomainError::Store(format!("Analysis task failed: {e}")))?
            });
            handles.push((post_id, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (post_id, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(analyses)) => PostAnalysisOutcome::Completed { post_id, analyses },
                Ok(Err(e)) => PostAnalysisOutcome::Failed {
                    post_id,
                    error: e.to_string(),
                },
                Err(e) => PostAnalysisOutcome::Failed {
                    post_id,
                    error: format!("Analysis task failed: {e}"),
                },
            };
            if let PostAnalysisOutcome::Failed { error, .. } = &outcome {
                warn!(%run_id, post_id, %error, "post analysis failed");
            }
            results.push(outcome);
        }

        let failed_posts = results.iter().filter(|r| !r.is_completed()).count();
        info!(%run_id, processed = results.len(), failed = failed_posts, "batch analysis finished");

        Ok(BatchAnalysisReport {
            metadata: BatchMetadata {
                run_id,
                total_posts,
                processed_posts: results.len(),
                failed_posts,
                kinds,
            },
            results,
        })
    }

    /// Runs a batch, then reads back the merged view of every completed post.
    pub async fn analyze_filtered_merged<S: AsRef<str>>(
        &self,
        filter: &PostFilter,
        kinds: &[S],
        persist: bool,
    ) -> Result<MergedBatchReport, DomainError> {
        let report = self.analyze_filtered_set(filter, kinds, persist).await?;
        let completed: Vec<i64> = report
            .results
            .iter()
            .filter(|r| r.is_completed())
            .map(PostAnalysisOutcome::post_id)
            .collect();
        let coordinator = self.clone();
        let results = tokio::task::spawn_blocking(move || {
            completed
                .into_iter()
                .map(|post_id| coordinator.get_or_compute(post_id, false))
                .collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(|e| DomainError::Store(format!("Merge task failed: {e}")))??;
        Ok(MergedBatchReport {
            results,
            metadata: report.metadata,
        })
    }

    fn find_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.posts
            .get(post_id, false)?
            .ok_or_else(|| DomainError::NotFound(format!("Post with id {post_id} not found")))
    }

    fn latest_rows(&self, post_id: i64) -> Result<BTreeMap<AnalysisKind, PostAnalysis>, DomainError> {
        let mut rows = BTreeMap::new();
        for kind in AnalysisKind::ALL {
            if let Some(row) = self.cache.latest(post_id, kind)? {
                rows.insert(kind, row);
            }
        }
        Ok(rows)
    }
}

fn analyze_post(
    analyzer: &TextAnalyzer,
    cache: &AnalysisCache,
    post: &Post,
    kinds: &[AnalysisKind],
    persist: bool,
) -> Result<BTreeMap<AnalysisKind, AnalysisOutput>, DomainError> {
    let analyses = analyzer.analyze(&post.content, kinds);
    if persist {
        cache.record_all(post.id, analyses.values())?;
    }
    Ok(analyses)
}

fn assemble(post_id: i64, rows: &BTreeMap<AnalysisKind, PostAnalysis>) -> Result<PostAnalysisResult, DomainError> {
    let mut result = PostAnalysisResult::empty(post_id);
    for (kind, row) in rows {
        let payload = row
            .payload()
            .map_err(|e| DomainError::Store(format!("Corrupt {kind} payload for post {post_id}: {e}")))?;
        match kind {
            AnalysisKind::WordFrequency => {
                let report: WordFrequencyReport = serde_json::from_value(payload.clone())?;
                result.word_frequencies = Some(report.word_frequencies);
            }
            AnalysisKind::TextStats => {
                let stats: TextStats = serde_json::from_value(payload.clone())?;
                result.text_stats = Some(stats);
            }
            AnalysisKind::Tags => {
                let report: TagsReport = serde_json::from_value(payload.clone())?;
                result.extracted_tags = Some(ExtractedTags {
                    tags: report.extracted_tags,
                });
            }
        }
        result.raw_analysis.insert(*kind, payload);
    }
    Ok(result)
}
