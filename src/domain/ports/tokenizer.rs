use crate::domain::values::language::LanguageSet;

/// Language-aware text segmentation used by the analyzer and the filter
/// compiler.
pub trait Tokenizer: Send + Sync {
    fn tokenize_sentences(&self, text: &str) -> Vec<String>;
    /// Words and punctuation tokens, whitespace dropped.
    ///
    /// Word boundaries follow UAX #29: contractions, possessives and decimals
    /// (`don't`, `O'Reilly`, `3.14`) stay single tokens rather than being
    /// split as an NLTK-style tokenizer would.
    fn tokenize_words(&self, text: &str) -> Vec<String>;
    /// `word` is expected lower-cased.
    fn is_stopword(&self, word: &str, languages: &LanguageSet) -> bool;
    /// Lower-cased alphanumeric runs of `text`, in the shape both the
    /// full-text index and its queries are built from.
    fn search_words(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        self.tokenize_words(&cleaned)
            .into_iter()
            .filter(|w| w.chars().all(char::is_alphanumeric))
            .collect()
    }
    /// The form a lower-cased word takes in the full-text index. English is
    /// stemmed by the index itself, so the default leaves words unchanged.
    fn search_stem(&self, word: &str, _languages: &LanguageSet) -> String {
        word.to_string()
    }
}
