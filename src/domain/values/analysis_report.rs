use crate::domain::values::analysis_kind::AnalysisKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
    pub frequency: f64,
}

/// Payload of a `word_frequency` analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordFrequencyReport {
    pub total_unique_words: usize,
    pub total_words_after_filtering: usize,
    pub word_frequencies: Vec<WordFrequency>,
}

/// Payload of a `text_stats` analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub word_count: usize,
    pub char_count: usize,
    pub sentence_count: usize,
    pub avg_word_length: f64,
    pub avg_sentence_length: f64,
}

/// Payload of a `tags` analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagsReport {
    pub extracted_tags: Vec<String>,
    pub hashtags: Vec<String>,
}

/// The payload of any single analysis; serializes as the bare report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutput {
    WordFrequency(WordFrequencyReport),
    TextStats(TextStats),
    Tags(TagsReport),
}

impl AnalysisOutput {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisOutput::WordFrequency(_) => AnalysisKind::WordFrequency,
            AnalysisOutput::TextStats(_) => AnalysisKind::TextStats,
            AnalysisOutput::Tags(_) => AnalysisKind::Tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTags {
    pub tags: Vec<String>,
}

/// Latest analyses of one post merged into a single value.
///
/// A field is `Some` only when a row of that kind exists. `raw_analysis`
/// holds the decoded payload of each present kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostAnalysisResult {
    pub post_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_frequencies: Option<Vec<WordFrequency>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_stats: Option<TextStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_tags: Option<ExtractedTags>,
    pub raw_analysis: BTreeMap<AnalysisKind, serde_json::Value>,
}

impl PostAnalysisResult {
    pub fn empty(post_id: i64) -> Self {
        Self {
            post_id,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_analysis.is_empty()
    }
}
