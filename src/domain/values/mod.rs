pub mod analysis_kind;
pub mod analysis_report;
pub mod language;
pub mod page;
pub mod post_filter;
