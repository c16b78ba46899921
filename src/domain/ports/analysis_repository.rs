use crate::domain::entities::post_analysis::{NewPostAnalysis, PostAnalysis};
use crate::domain::error::DomainError;
use crate::domain::values::analysis_kind::AnalysisKind;

pub trait AnalysisRepository: Send + Sync {
    fn add(&self, analysis: &NewPostAnalysis) -> Result<PostAnalysis, DomainError>;
    /// Inserts every row or none of them.
    fn add_all(&self, analyses: &[NewPostAnalysis]) -> Result<Vec<PostAnalysis>, DomainError>;
    /// Oldest first.
    fn list(&self, post_id: i64, kind: Option<AnalysisKind>) -> Result<Vec<PostAnalysis>, DomainError>;
    fn latest(&self, post_id: i64, kind: AnalysisKind) -> Result<Option<PostAnalysis>, DomainError>;
}
