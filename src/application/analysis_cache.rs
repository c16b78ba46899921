use crate::domain::entities::post_analysis::{NewPostAnalysis, PostAnalysis};
use crate::domain::error::DomainError;
use crate::domain::ports::analysis_repository::AnalysisRepository;
use crate::domain::values::analysis_kind::AnalysisKind;
use crate::domain::values::analysis_report::AnalysisOutput;
use std::sync::Arc;

/// Append-only store of analysis runs; reads only ever see the latest run of
/// each (post, kind).
#[derive(Clone)]
pub struct AnalysisCache {
    repo: Arc<dyn AnalysisRepository>,
}

impl AnalysisCache {
    pub fn new(repo: Arc<dyn AnalysisRepository>) -> Self {
        Self { repo }
    }

    /// Appends a new row even when an identical one exists.
    pub fn record(&self, post_id: i64, output: &AnalysisOutput) -> Result<PostAnalysis, DomainError> {
        self.repo.add(&Self::new_row(post_id, output)?)
    }

    /// Appends one row per output in a single transaction.
    pub fn record_all<'a, I>(&self, post_id: i64, outputs: I) -> Result<Vec<PostAnalysis>, DomainError>
    where
        I: IntoIterator<Item = &'a AnalysisOutput>,
    {
        let rows = outputs
            .into_iter()
            .map(|output| Self::new_row(post_id, output))
            .collect::<Result<Vec<_>, _>>()?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.repo.add_all(&rows)
    }

    /// Stores a pre-encoded payload. The kind name is checked here because
    /// callers of this entry point hold it as a string.
    pub fn record_raw(&self, post_id: i64, kind: &str, payload: String) -> Result<PostAnalysis, DomainError> {
        let kind: AnalysisKind = kind.parse()?;
        self.repo.add(&NewPostAnalysis {
            post_id,
            kind,
            result: payload,
        })
    }

    pub fn latest(&self, post_id: i64, kind: AnalysisKind) -> Result<Option<PostAnalysis>, DomainError> {
        self.repo.latest(post_id, kind)
    }

    pub fn history(&self, post_id: i64, kind: Option<AnalysisKind>) -> Result<Vec<PostAnalysis>, DomainError> {
        self.repo.list(post_id, kind)
    }

    fn new_row(post_id: i64, output: &AnalysisOutput) -> Result<NewPostAnalysis, DomainError> {
        Ok(NewPostAnalysis {
            post_id,
            kind: output.kind(),
            result: serde_json::to_string(output)?,
        })
    }
}
