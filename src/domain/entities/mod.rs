pub mod category;
pub mod post;
pub mod post_analysis;
