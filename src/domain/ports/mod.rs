pub mod analysis_repository;
pub mod category_repository;
pub mod post_repository;
pub mod tokenizer;
