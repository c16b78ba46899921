mod common;

use common::{add_category, add_post, setup};
use postlens::domain::entities::category::{CategoryUpdate, NewCategory};
use postlens::domain::error::DomainError;
use postlens::domain::values::post_filter::PostFilter;

#[test]
fn test_create_and_get_category() {
    let pl = setup();
    let created = pl
        .create_category(NewCategory::new("Technology", Some("Tech news".into())))
        .unwrap();
    assert!(created.id > 0);

    let fetched = pl.get_category(created.id).unwrap();
    assert_eq!(fetched.name, "Technology");
    assert_eq!(fetched.description.as_deref(), Some("Tech news"));
}

#[test]
fn test_duplicate_name_is_conflict() {
    let pl = setup();
    add_category(&pl, "Science");
    let err = pl.create_category(NewCategory::new("Science", None)).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert!(err.to_string().contains("Science"));
}

#[test]
fn test_rename_to_taken_name_is_conflict() {
    let pl = setup();
    add_category(&pl, "Sports");
    let music = add_category(&pl, "Music");
    let err = pl
        .update_category(
            music.id,
            CategoryUpdate {
                name: Some("Sports".into()),
                ..CategoryUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[test]
fn test_update_keeps_unset_fields() {
    let pl = setup();
    let created = pl
        .create_category(NewCategory::new("Travel", Some("Trips".into())))
        .unwrap();
    let updated = pl
        .update_category(
            created.id,
            CategoryUpdate {
                name: Some("Travel".into()),
                description: Some("Journeys".into()),
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Travel");
    assert_eq!(updated.description.as_deref(), Some("Journeys"));
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn test_missing_category_is_not_found() {
    let pl = setup();
    assert!(matches!(pl.get_category(99), Err(DomainError::NotFound(_))));
    assert!(matches!(pl.delete_category(99), Err(DomainError::NotFound(_))));
    assert!(matches!(
        pl.update_category(99, CategoryUpdate::default()),
        Err(DomainError::NotFound(_))
    ));
}

#[test]
fn test_list_categories_in_creation_order() {
    let pl = setup();
    add_category(&pl, "B");
    add_category(&pl, "A");
    let names: Vec<String> = pl.list_categories().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn test_delete_cascades_to_posts_index_and_analyses() {
    let pl = setup();
    let doomed = add_category(&pl, "Doomed");
    let kept = add_category(&pl, "Kept");
    let gone = add_post(&pl, doomed.id, None, "Volcanoes erupt spectacularly");
    add_post(&pl, kept.id, None, "Volcanoes sleep quietly");
    pl.get_analysis(gone.id, true).unwrap();

    pl.delete_category(doomed.id).unwrap();

    assert!(matches!(pl.get_post(gone.id), Err(DomainError::NotFound(_))));
    assert!(pl.analysis_history(gone.id, None).unwrap().is_empty());

    let page = pl
        .list_posts(&PostFilter::default().with_search("volcanoes", true))
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].category_id, kept.id);
}
