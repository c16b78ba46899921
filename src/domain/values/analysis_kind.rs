use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    WordFrequency,
    TextStats,
    Tags,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::WordFrequency,
        AnalysisKind::TextStats,
        AnalysisKind::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::WordFrequency => "word_frequency",
            AnalysisKind::TextStats => "text_stats",
            AnalysisKind::Tags => "tags",
        }
    }

    /// Parses every name, reporting all unknown ones at once.
    ///
    /// An empty input selects every kind. Duplicates are collapsed, keeping
    /// the first occurrence.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<AnalysisKind>, DomainError> {
        if names.is_empty() {
            return Ok(Self::ALL.to_vec());
        }

        let mut kinds = Vec::with_capacity(names.len());
        let mut invalid = Vec::new();
        for name in names {
            match name.as_ref().parse::<AnalysisKind>() {
                Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
                Ok(_) => {}
                Err(_) => invalid.push(name.as_ref().to_string()),
            }
        }

        if !invalid.is_empty() {
            return Err(DomainError::Validation(format!(
                "Invalid analysis kind(s): {}. Valid kinds are: {}",
                invalid.join(", "),
                Self::valid_names()
            )));
        }
        Ok(kinds)
    }

    fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word_frequency" => Ok(AnalysisKind::WordFrequency),
            "text_stats" => Ok(AnalysisKind::TextStats),
            "tags" => Ok(AnalysisKind::Tags),
            _ => Err(DomainError::Validation(format!(
                "Invalid analysis kind: {s}. Valid kinds are: {}",
                Self::valid_names()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_display() {
        for kind in AnalysisKind::ALL {
            assert_eq!(kind.to_string().parse::<AnalysisKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_empty_selection_means_all() {
        let kinds = AnalysisKind::parse_all::<&str>(&[]).unwrap();
        assert_eq!(kinds, AnalysisKind::ALL.to_vec());
    }

    #[test]
    fn test_unknown_kinds_are_all_named() {
        let err = AnalysisKind::parse_all(&["tags", "sentiment", "topics"]).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(msg.contains("sentiment"));
        assert!(msg.contains("topics"));
        assert!(msg.contains("word_frequency, text_stats, tags"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let kinds = AnalysisKind::parse_all(&["tags", "tags", "text_stats"]).unwrap();
        assert_eq!(kinds, vec![AnalysisKind::Tags, AnalysisKind::TextStats]);
    }
}
