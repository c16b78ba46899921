use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages with a built-in stop-word list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Russian,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "english"),
            Language::Russian => write!(f, "russian"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "russian" | "ru" => Ok(Language::Russian),
            _ => Err(format!("Unknown language: {s}")),
        }
    }
}

/// The set of languages whose stop words are filtered out together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSet(Vec<Language>);

impl LanguageSet {
    pub fn new(languages: Vec<Language>) -> Self {
        let mut unique = Vec::with_capacity(languages.len());
        for lang in languages {
            if !unique.contains(&lang) {
                unique.push(lang);
            }
        }
        Self(unique)
    }

    pub fn languages(&self) -> &[Language] {
        &self.0
    }

    pub fn contains(&self, lang: Language) -> bool {
        self.0.contains(&lang)
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self(vec![Language::Russian, Language::English])
    }
}
