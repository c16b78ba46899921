//! Turns [`PostFilter`] parameters into the predicate set and page plan the
//! post repository executes.

use crate::domain::ports::post_repository::PostPredicate;
use crate::domain::ports::tokenizer::Tokenizer;
use crate::domain::values::language::LanguageSet;
use crate::domain::values::post_filter::PostFilter;
use std::sync::Arc;

/// A compiled listing: the same predicates drive the count and the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub predicates: Vec<PostPredicate>,
    pub offset: usize,
    pub limit: usize,
}

pub struct FilterCompiler {
    tokenizer: Arc<dyn Tokenizer>,
    languages: LanguageSet,
}

impl FilterCompiler {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, languages: LanguageSet) -> Self {
        Self { tokenizer, languages }
    }

    /// Pagination is passed through as given; callers validate it first.
    pub fn compile(&self, filter: &PostFilter) -> PostQuery {
        let mut predicates = Vec::new();

        if let Some(id) = filter.category_id {
            predicates.push(PostPredicate::CategoryId(id));
        }
        if let Some(name) = &filter.category_name {
            predicates.push(PostPredicate::CategoryName(name.clone()));
        }
        if let Some(text) = filter.search_text() {
            if filter.use_fulltext {
                predicates.push(self.fulltext_predicate(text));
            } else {
                predicates.push(PostPredicate::Substring(text.to_lowercase()));
            }
        }

        PostQuery {
            predicates,
            offset: filter.offset,
            limit: filter.limit,
        }
    }

    /// Plain-text query semantics: every remaining term must match.
    ///
    /// Punctuation splits terms the same way the index tokenizer splits the
    /// stored text, so `3.14` searches for `3` and `14`. Terms are
    /// alphanumeric and quoted, so no FTS5 operator can come from user input.
    fn fulltext_predicate(&self, text: &str) -> PostPredicate {
        let terms: Vec<String> = self
            .tokenizer
            .search_words(text)
            .into_iter()
            .filter(|w| !self.tokenizer.is_stopword(w, &self.languages))
            .map(|w| format!("\"{}\"", self.tokenizer.search_stem(&w, &self.languages)))
            .collect();

        if terms.is_empty() {
            PostPredicate::MatchNone
        } else {
            PostPredicate::FullText(terms.join(" "))
        }
    }
}
