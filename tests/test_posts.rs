mod common;

use common::{add_category, add_post, setup};
use postlens::domain::entities::post::{NewPost, PostUpdate};
use postlens::domain::error::DomainError;
use postlens::domain::values::post_filter::PostFilter;

#[test]
fn test_create_post_loads_category() {
    let pl = setup();
    let category = add_category(&pl, "Tech");
    let post = add_post(&pl, category.id, Some("Hello"), "First post");

    assert_eq!(post.category_id, category.id);
    assert_eq!(post.search_document, "Hello First post");
    assert_eq!(post.category.as_ref().map(|c| c.name.as_str()), Some("Tech"));

    let fetched = pl.get_post(post.id).unwrap();
    assert_eq!(fetched.content, "First post");
    assert!(fetched.category.is_some());
}

#[test]
fn test_post_with_missing_category_is_not_found() {
    let pl = setup();
    let err = pl.create_post(NewPost::new(42, None, "orphan")).unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[test]
fn test_empty_content_is_rejected() {
    let pl = setup();
    let category = add_category(&pl, "Tech");
    let err = pl.create_post(NewPost::new(category.id, None, "")).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[test]
fn test_move_post_to_missing_category_is_not_found() {
    let pl = setup();
    let category = add_category(&pl, "Tech");
    let post = add_post(&pl, category.id, None, "Some content");
    let err = pl
        .update_post(
            post.id,
            PostUpdate {
                category_id: Some(777),
                ..PostUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[test]
fn test_update_title_only_keeps_content() {
    let pl = setup();
    let category = add_category(&pl, "Tech");
    let post = add_post(&pl, category.id, None, "Stable body");
    let updated = pl
        .update_post(
            post.id,
            PostUpdate {
                title: Some(Some("New title".into())),
                ..PostUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.content, "Stable body");
    assert_eq!(updated.title.as_deref(), Some("New title"));
    assert_eq!(updated.search_document, "New title Stable body");
}

#[test]
fn test_null_title_clears_title() {
    let pl = setup();
    let category = add_category(&pl, "Tech");
    let post = add_post(&pl, category.id, Some("Walruses"), "Stable body");
    let update: PostUpdate = serde_json::from_str(r#"{"title": null}"#).unwrap();

    let updated = pl.update_post(post.id, update).unwrap();

    assert_eq!(updated.title, None);
    assert_eq!(updated.content, "Stable body");
    assert_eq!(updated.search_document, " Stable body");
    let hits = pl
        .list_posts(&PostFilter::default().with_search("walruses", true))
        .unwrap();
    assert_eq!(hits.total, 0);
}

#[test]
fn test_content_update_moves_fulltext_matches() {
    let pl = setup();
    let category = add_category(&pl, "Nature");
    let post = add_post(&pl, category.id, None, "Elephants roam the savanna");

    let by = |word: &str| {
        pl.list_posts(&PostFilter::default().with_search(word, true))
            .unwrap()
            .total
    };
    assert_eq!(by("elephants"), 1);

    pl.update_post(
        post.id,
        PostUpdate {
            content: Some("Penguins waddle across the ice".into()),
            ..PostUpdate::default()
        },
    )
    .unwrap();

    assert_eq!(by("elephants"), 0);
    assert_eq!(by("penguins"), 1);
}

#[test]
fn test_delete_post() {
    let pl = setup();
    let category = add_category(&pl, "Tech");
    let post = add_post(&pl, category.id, None, "Short lived glaciers");
    pl.get_analysis(post.id, true).unwrap();

    pl.delete_post(post.id).unwrap();

    assert!(matches!(pl.get_post(post.id), Err(DomainError::NotFound(_))));
    assert!(matches!(pl.delete_post(post.id), Err(DomainError::NotFound(_))));
    assert!(pl.analysis_history(post.id, None).unwrap().is_empty());
    let page = pl
        .list_posts(&PostFilter::default().with_search("glaciers", true))
        .unwrap();
    assert_eq!(page.total, 0);
}

#[test]
fn test_database_on_disk_survives_reopen() {
    use postlens::config::AppConfig;
    use postlens::PostLens;

    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.database.path = dir.path().join("posts.db").to_string_lossy().into_owned();

    let post_id = {
        let pl = PostLens::new(&config).unwrap();
        let category = add_category(&pl, "Persistent");
        add_post(&pl, category.id, Some("Kept"), "Written to disk").id
    };

    let pl = PostLens::new(&config).unwrap();
    let post = pl.get_post(post_id).unwrap();
    assert_eq!(post.title.as_deref(), Some("Kept"));
    let page = pl
        .list_posts(&PostFilter::default().with_search("disk", true))
        .unwrap();
    assert_eq!(page.total, 1);
}
