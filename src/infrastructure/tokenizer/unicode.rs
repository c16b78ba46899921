//! Tokenizer built on Unicode text segmentation (UAX #29).

use crate::domain::ports::tokenizer::Tokenizer;
use crate::domain::values::language::{Language, LanguageSet};
use crate::infrastructure::tokenizer::stemmer::{is_cyrillic, stem_russian};
use crate::infrastructure::tokenizer::stopwords::stop_words;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeTokenizer;

impl UnicodeTokenizer {
    pub fn new() -> Self {
        UnicodeTokenizer
    }
}

impl Tokenizer for UnicodeTokenizer {
    fn tokenize_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    fn tokenize_words(&self, text: &str) -> Vec<String> {
        text.split_word_bounds()
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
            .collect()
    }

    fn is_stopword(&self, word: &str, languages: &LanguageSet) -> bool {
        languages
            .languages()
            .iter()
            .any(|lang| stop_words(*lang).contains(word))
    }

    fn search_stem(&self, word: &str, languages: &LanguageSet) -> String {
        let alphabetic = !word.is_empty() && word.chars().all(char::is_alphabetic);
        if alphabetic && languages.contains(Language::Russian) && is_cyrillic(word) {
            stem_russian(word)
        } else {
            word.to_string()
        }
    }
}
