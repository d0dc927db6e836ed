/// Upstream data providers
///
/// The discovery page depends on two black-box HTTP services: a recommendation
/// engine that turns a free-text query into candidate titles, and a metadata
/// service that resolves one title to a full record. Each sits behind a trait so
/// the pipelines can be exercised against fakes.
use crate::{
    error::AppResult,
    models::{MovieRecord, SearchQuery},
};

pub mod omdb;
pub mod recommender;

pub use omdb::OmdbProvider;
pub use recommender::HttpRecommender;

/// Trait for recommendation sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Candidate titles for a query, in the order the engine ranks them
    async fn recommend(&self, query: &SearchQuery) -> AppResult<Vec<String>>;
}

/// Trait for movie metadata sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Resolve one title by exact match
    ///
    /// A provider-level "not found" is still `Ok`; check `MovieRecord::found`.
    async fn lookup(&self, title: &str) -> AppResult<MovieRecord>;
}
