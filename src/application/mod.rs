pub mod analysis_cache;
pub mod analyzer;
pub mod batch_analysis;
pub mod categories;
pub mod filter;
pub mod posts;
pub mod query;
