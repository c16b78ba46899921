//! Snowball stemming for words the FTS5 porter tokenizer leaves untouched.

use rust_stemmers::{Algorithm, Stemmer};
use std::sync::LazyLock;

static RUSSIAN: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::Russian));

/// `word` must be lower-cased.
pub fn stem_russian(word: &str) -> String {
    RUSSIAN.stem(word).into_owned()
}

pub fn is_cyrillic(word: &str) -> bool {
    word.chars().any(|c| matches!(c, '\u{0400}'..='\u{04FF}'))
}
