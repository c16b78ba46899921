//! Shared test helpers.
#![allow(dead_code)]

use postlens::config::AppConfig;
use postlens::domain::entities::category::{Category, NewCategory};
use postlens::domain::entities::post::{NewPost, Post};
use postlens::PostLens;

pub fn setup() -> PostLens {
    PostLens::new(&AppConfig::in_memory()).unwrap()
}

pub fn add_category(pl: &PostLens, name: &str) -> Category {
    pl.create_category(NewCategory::new(name, None)).unwrap()
}

pub fn add_post(pl: &PostLens, category_id: i64, title: Option<&str>, content: &str) -> Post {
    pl.create_post(NewPost::new(category_id, title, content)).unwrap()
}

/// One category holding `count` posts numbered from 1.
pub fn seed_posts(pl: &PostLens, category: &str, count: usize) -> (Category, Vec<Post>) {
    let category = add_category(pl, category);
    let posts = (1..=count)
        .map(|i| {
            let title = format!("Post {i}");
            add_post(pl, category.id, Some(title.as_str()), &format!("Body number {i} about gardens"))
        })
        .collect();
    (category, posts)
}
