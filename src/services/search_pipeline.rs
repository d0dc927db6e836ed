use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use tracing::instrument;

use crate::{
    error::AppResult,
    models::{PipelineResult, SearchQuery},
    services::{enrichment::Enricher, providers::RecommendationProvider},
};

/// Query → recommended titles → parallel metadata lookups → ordered records
///
/// Runs are independent: nothing here serializes or cancels overlapping
/// invocations. Callers that need "latest wins" sequence them (see
/// `page::DiscoveryController`).
#[derive(Clone)]
pub struct SearchPipeline {
    recommender: Arc<dyn RecommendationProvider>,
    enricher: Enricher,
    in_flight: Arc<AtomicUsize>,
}

/// Marks a run as in flight until dropped, on every exit path
struct LoadingGuard(Arc<AtomicUsize>);

impl LoadingGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SearchPipeline {
    pub fn new(recommender: Arc<dyn RecommendationProvider>, enricher: Enricher) -> Self {
        Self {
            recommender,
            enricher,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Runs currently between their recommendation call and their result
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Runs one search
    ///
    /// Fails with `Upstream`/`HttpClient` if the recommendation call fails and with
    /// `Enrichment` if any metadata lookup fails; there is no partial result.
    /// Not-found records from the metadata service are kept in place so the
    /// result stays aligned with the recommendation order.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn run(&self, query: &SearchQuery) -> AppResult<PipelineResult> {
        let _loading = LoadingGuard::acquire(&self.in_flight);

        let titles = self.recommender.recommend(query).await?;
        let candidates = titles.len();
        let records = self.enricher.resolve_all(titles).await?;

        tracing::info!(
            candidates,
            not_found = records.iter().filter(|r| !r.found).count(),
            "Search pipeline completed"
        );

        Ok(records)
    }
}
