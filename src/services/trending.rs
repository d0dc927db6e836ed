use crate::{models::MovieRecord, services::enrichment::Enricher};

/// Canonical titles shown before the first search
pub const TRENDING_TITLES: [&str; 8] = [
    "The Dark Knight",
    "Inception",
    "Pulp Fiction",
    "The Matrix",
    "Interstellar",
    "The Godfather",
    "Fight Club",
    "Goodfellas",
];

/// Resolves the fixed trending list once at startup
///
/// Failed lookups and provider "not found" replies are dropped, so the result
/// may be shorter than the input list. Order follows `TRENDING_TITLES`.
#[derive(Clone)]
pub struct TrendingLoader {
    enricher: Enricher,
}

impl TrendingLoader {
    pub fn new(enricher: Enricher) -> Self {
        Self { enricher }
    }

    pub async fn run(&self) -> Vec<MovieRecord> {
        let titles = TRENDING_TITLES.iter().map(|t| t.to_string()).collect();
        let records: Vec<MovieRecord> = self
            .enricher
            .resolve_available(titles)
            .await
            .into_iter()
            .filter(|record| record.found)
            .collect();

        tracing::info!(
            requested = TRENDING_TITLES.len(),
            loaded = records.len(),
            "Trending movies loaded"
        );

        records
    }
}
