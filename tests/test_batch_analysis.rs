mod common;

use common::{add_category, add_post, seed_posts, setup};
use postlens::application::batch_analysis::PostAnalysisOutcome;
use postlens::config::AppConfig;
use postlens::domain::error::DomainError;
use postlens::domain::ports::tokenizer::Tokenizer;
use postlens::domain::values::analysis_kind::AnalysisKind;
use postlens::domain::values::language::LanguageSet;
use postlens::domain::values::post_filter::PostFilter;
use postlens::infrastructure::tokenizer::UnicodeTokenizer;
use postlens::PostLens;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const NO_KINDS: &[&str] = &[];

/// Tracks how many word tokenizations run at once, and once armed panics on
/// a marker word.
#[derive(Default)]
struct CountingTokenizer {
    inner: UnicodeTokenizer,
    active: AtomicUsize,
    peak: AtomicUsize,
    armed: AtomicBool,
}

impl Tokenizer for CountingTokenizer {
    fn tokenize_sentences(&self, text: &str) -> Vec<String> {
        self.inner.tokenize_sentences(text)
    }

    fn tokenize_words(&self, text: &str) -> Vec<String> {
        if self.armed.load(Ordering::SeqCst) && text.to_lowercase().contains("explode") {
            panic!("tokenizer exploded");
        }
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(15));
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.inner.tokenize_words(text)
    }

    fn is_stopword(&self, word: &str, languages: &LanguageSet) -> bool {
        self.inner.is_stopword(word, languages)
    }
}

fn setup_counting(max_workers: usize) -> (PostLens, Arc<CountingTokenizer>) {
    let mut config = AppConfig::in_memory();
    config.analysis.max_workers = max_workers;
    let tokenizer = Arc::new(CountingTokenizer::default());
    let pl = PostLens::with_tokenizer(&config, tokenizer.clone()).unwrap();
    (pl, tokenizer)
}

#[tokio::test]
async fn test_unknown_kind_fails_before_any_write() {
    let pl = setup();
    let (_, posts) = seed_posts(&pl, "Garden", 3);

    let err = pl
        .analyze_batch(&PostFilter::default(), &["tags", "sentiment"], true)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    let message = err.to_string();
    assert!(message.contains("sentiment"));
    assert!(message.contains("word_frequency, text_stats, tags"));

    for post in posts {
        assert!(pl.analysis_history(post.id, None).unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_invalid_pagination_fails_whole_call() {
    let pl = setup();
    seed_posts(&pl, "Garden", 1);
    let err = pl
        .analyze_batch(&PostFilter::page(0, 0), NO_KINDS, true)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_batch_reports_in_page_order_with_metadata() {
    let pl = setup();
    let (_, posts) = seed_posts(&pl, "Garden", 5);

    let report = pl
        .analyze_batch(&PostFilter::page(3, 1), NO_KINDS, true)
        .await
        .unwrap();

    assert_eq!(report.metadata.total_posts, 5);
    assert_eq!(report.metadata.processed_posts, 3);
    assert_eq!(report.metadata.failed_posts, 0);
    assert_eq!(report.metadata.kinds, AnalysisKind::ALL.to_vec());

    let ids: Vec<i64> = report.results.iter().map(|r| r.post_id()).collect();
    assert_eq!(ids, vec![posts[1].id, posts[2].id, posts[3].id]);
    for outcome in &report.results {
        let PostAnalysisOutcome::Completed { analyses, .. } = outcome else {
            panic!("expected completed outcome");
        };
        assert_eq!(analyses.len(), 3);
    }
    assert_eq!(pl.analysis_history(posts[1].id, None).unwrap().len(), 3);
    assert!(pl.analysis_history(posts[0].id, None).unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_computes_exactly_requested_kinds() {
    let pl = setup();
    let (_, posts) = seed_posts(&pl, "Garden", 2);

    let report = pl
        .analyze_batch(&PostFilter::default(), &["tags", "tags"], true)
        .await
        .unwrap();
    assert_eq!(report.metadata.kinds, vec![AnalysisKind::Tags]);

    let history = pl.analysis_history(posts[0].id, None).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, AnalysisKind::Tags);
}

#[tokio::test]
async fn test_batch_without_persist_writes_nothing() {
    let pl = setup();
    let (_, posts) = seed_posts(&pl, "Garden", 2);

    let report = pl
        .analyze_batch(&PostFilter::default(), &["text_stats"], false)
        .await
        .unwrap();
    assert!(report.results.iter().all(|r| r.is_completed()));
    for post in posts {
        assert!(pl.analysis_history(post.id, None).unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_batch_always_recomputes() {
    let pl = setup();
    let category = add_category(&pl, "Tech");
    let post = add_post(&pl, category.id, None, "Analysed over and over");
    pl.get_analysis(post.id, true).unwrap();

    pl.analyze_batch(&PostFilter::default(), &["text_stats"], true)
        .await
        .unwrap();
    pl.analyze_batch(&PostFilter::default(), &["text_stats"], true)
        .await
        .unwrap();

    let stats_rows = pl
        .analysis_history(post.id, Some(AnalysisKind::TextStats))
        .unwrap();
    assert_eq!(stats_rows.len(), 3);
}

#[tokio::test]
async fn test_batch_respects_filters() {
    let pl = setup();
    let tech = add_category(&pl, "Tech");
    let food = add_category(&pl, "Food");
    let kept = add_post(&pl, tech.id, None, "Compilers are fun");
    add_post(&pl, food.id, None, "Bread is fun");

    let report = pl
        .analyze_batch(&PostFilter::default().with_category_name("Tech"), NO_KINDS, false)
        .await
        .unwrap();
    assert_eq!(report.metadata.total_posts, 1);
    assert_eq!(report.results[0].post_id(), kept.id);
}

#[tokio::test]
async fn test_empty_page_yields_empty_report() {
    let pl = setup();
    let report = pl
        .analyze_batch(&PostFilter::default(), NO_KINDS, true)
        .await
        .unwrap();
    assert!(report.results.is_empty());
    assert_eq!(report.metadata.total_posts, 0);
    assert_eq!(report.metadata.processed_posts, 0);
}

#[tokio::test]
async fn test_merged_batch_returns_latest_views() {
    let pl = setup();
    let (_, posts) = seed_posts(&pl, "Garden", 3);

    let merged = pl
        .analyze_batch_merged(&PostFilter::default(), &["word_frequency"], true)
        .await
        .unwrap();
    assert_eq!(merged.results.len(), 3);
    assert_eq!(merged.results[0].post_id, posts[0].id);
    assert!(merged.results.iter().all(|r| r.word_frequencies.is_some()));
    assert!(merged.results.iter().all(|r| r.text_stats.is_none()));
}

#[tokio::test]
async fn test_report_serializes_with_status_tags() {
    let pl = setup();
    seed_posts(&pl, "Garden", 1);
    let report = pl
        .analyze_batch(&PostFilter::default(), &["text_stats"], false)
        .await
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["results"][0]["status"], "completed");
    assert!(value["results"][0]["analyses"]["text_stats"]["word_count"].is_number());
    assert_eq!(value["metadata"]["kinds"], serde_json::json!(["text_stats"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_worker_ceiling_is_respected() {
    let (pl, tokenizer) = setup_counting(2);
    seed_posts(&pl, "Garden", 8);

    let report = pl
        .analyze_batch(&PostFilter::default(), NO_KINDS, true)
        .await
        .unwrap();
    assert_eq!(report.metadata.failed_posts, 0);
    let peak = tokenizer.peak.load(Ordering::SeqCst);
    assert!((1..=2).contains(&peak), "peak concurrency was {peak}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_worker_serializes_posts() {
    let (pl, tokenizer) = setup_counting(1);
    seed_posts(&pl, "Garden", 4);

    pl.analyze_batch(&PostFilter::default(), &["word_frequency"], false)
        .await
        .unwrap();
    assert_eq!(tokenizer.peak.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failing_post_does_not_abort_siblings() {
    let (pl, tokenizer) = setup_counting(2);
    let category = add_category(&pl, "Mixed");
    let first = add_post(&pl, category.id, None, "Calm content");
    let bad = add_post(&pl, category.id, None, "This will explode");
    let last = add_post(&pl, category.id, None, "More calm content");
    tokenizer.armed.store(true, Ordering::SeqCst);

    let report = pl
        .analyze_batch(&PostFilter::default(), &["word_frequency"], true)
        .await
        .unwrap();

    assert_eq!(report.metadata.processed_posts, 3);
    assert_eq!(report.metadata.failed_posts, 1);
    assert!(report.results[0].is_completed());
    assert!(report.results[2].is_completed());
    match &report.results[1] {
        PostAnalysisOutcome::Failed { post_id, .. } => assert_eq!(*post_id, bad.id),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(pl.analysis_history(first.id, None).unwrap().len(), 1);
    assert_eq!(pl.analysis_history(last.id, None).unwrap().len(), 1);
    assert!(pl.analysis_history(bad.id, None).unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_merged_batches_share_one_runtime_thread() {
    let pl = setup();
    let (_, posts) = seed_posts(&pl, "Garden", 4);
    let filter = PostFilter::default();

    let (a, b) = tokio::join!(
        pl.analyze_batch_merged(&filter, &["tags"], true),
        pl.analyze_batch_merged(&filter, &["text_stats"], true),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.results.len(), posts.len());
    assert_eq!(b.results.len(), posts.len());
    assert!(a.results.iter().all(|r| r.extracted_tags.is_some()));
    assert!(b.results.iter().all(|r| r.text_stats.is_some()));
    for post in &posts {
        assert_eq!(pl.analysis_history(post.id, None).unwrap().len(), 2);
    }
}
