pub mod enrichment;
pub mod genre_filter;
pub mod providers;
pub mod search_pipeline;
pub mod trending;

pub use enrichment::Enricher;
pub use search_pipeline::SearchPipeline;
pub use trending::TrendingLoader;
