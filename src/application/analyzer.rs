//! Text analyses over post content: word frequency, text statistics and tag
//! extraction. Everything here is pure; the tokenizer supplies segmentation
//! and stop words.

use crate::domain::ports::tokenizer::Tokenizer;
use crate::domain::values::analysis_kind::AnalysisKind;
use crate::domain::values::analysis_report::{
    AnalysisOutput, TagsReport, TextStats, WordFrequency, WordFrequencyReport,
};
use crate::domain::values::language::LanguageSet;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock};

const TOP_WORDS: usize = 20;
const TOP_TAGS: usize = 10;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid non-word pattern"));
static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid hashtag pattern"));

pub struct TextAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    languages: LanguageSet,
}

impl TextAnalyzer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, languages: LanguageSet) -> Self {
        Self { tokenizer, languages }
    }

    /// Runs each requested kind once, in the order given.
    pub fn analyze(&self, content: &str, kinds: &[AnalysisKind]) -> BTreeMap<AnalysisKind, AnalysisOutput> {
        kinds
            .iter()
            .map(|kind| (*kind, self.run(content, *kind)))
            .collect()
    }

    pub fn run(&self, content: &str, kind: AnalysisKind) -> AnalysisOutput {
        match kind {
            AnalysisKind::WordFrequency => AnalysisOutput::WordFrequency(self.word_frequency(content)),
            AnalysisKind::TextStats => AnalysisOutput::TextStats(self.text_stats(content)),
            AnalysisKind::Tags => AnalysisOutput::Tags(self.tags(content)),
        }
    }

    pub fn word_frequency(&self, content: &str) -> WordFrequencyReport {
        let words = self.filtered_words(content);
        let total = words.len();
        let counts = count_in_first_seen_order(&words);

        let word_frequencies = counts
            .iter()
            .take(TOP_WORDS)
            .map(|(word, count)| WordFrequency {
                word: word.clone(),
                count: *count,
                frequency: if total > 0 { *count as f64 / total as f64 } else { 0.0 },
            })
            .collect();

        WordFrequencyReport {
            total_unique_words: counts.len(),
            total_words_after_filtering: total,
            word_frequencies,
        }
    }

    pub fn text_stats(&self, content: &str) -> TextStats {
        let sentence_count = self.tokenizer.tokenize_sentences(content).len();
        let words: Vec<String> = self
            .tokenizer
            .tokenize_words(content)
            .into_iter()
            .filter(|w| is_alphabetic(w))
            .collect();

        let word_count = words.len();
        let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let avg_word_length = if word_count > 0 {
            total_chars as f64 / word_count as f64
        } else {
            0.0
        };
        let avg_sentence_length = if sentence_count > 0 {
            word_count as f64 / sentence_count as f64
        } else {
            0.0
        };

        TextStats {
            word_count,
            char_count: content.chars().count(),
            sentence_count,
            avg_word_length: round2(avg_word_length),
            avg_sentence_length: round2(avg_sentence_length),
        }
    }

    pub fn tags(&self, content: &str) -> TagsReport {
        let words = self.filtered_words(content);
        let extracted_tags = count_in_first_seen_order(&words)
            .into_iter()
            .take(TOP_TAGS)
            .map(|(word, _)| word)
            .collect();
        let hashtags = HASHTAG
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .collect();

        TagsReport {
            extracted_tags,
            hashtags,
        }
    }

    /// Lower-cased alphabetic words that are not stop words, in text order.
    fn filtered_words(&self, content: &str) -> Vec<String> {
        let lowered = content.to_lowercase();
        let cleaned = NON_WORD.replace_all(&lowered, " ");
        self.tokenizer
            .tokenize_words(&cleaned)
            .into_iter()
            .filter(|w| is_alphabetic(w))
            .filter(|w| !self.tokenizer.is_stopword(w, &self.languages))
            .collect()
    }
}

fn is_alphabetic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Counts sorted by descending count; equal counts keep first-seen order.
fn count_in_first_seen_order(words: &[String]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in words {
        match index.get(word.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word.as_str(), counts.len());
                counts.push((word.clone(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
