use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::sync::RwLock;

use super::{
    state::{reduce, PageEvent, PageState},
    view::PageView,
};
use crate::{
    error::{AppError, AppResult},
    models::{GenreToken, MovieDetails, SearchQuery},
    services::{SearchPipeline, TrendingLoader},
};

/// Key that submits the current query
pub const SUBMIT_KEY: &str = "Enter";

/// What happened to a submitted search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; nothing was sent
    Ignored,
    /// Results were applied to the page
    Applied { results: usize },
    /// A newer search started before this one finished; its result was dropped
    Superseded,
}

/// Drives the discovery page: owns its state and runs the pipelines against it
///
/// Every search is tagged with a sequence number so only the most recently
/// started one can update the page.
#[derive(Clone)]
pub struct DiscoveryController {
    pipeline: SearchPipeline,
    trending: TrendingLoader,
    state: Arc<RwLock<PageState>>,
    sequence: Arc<AtomicU64>,
}

impl DiscoveryController {
    pub fn new(pipeline: SearchPipeline, trending: TrendingLoader) -> Self {
        Self {
            pipeline,
            trending,
            state: Arc::new(RwLock::new(PageState::default())),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    async fn dispatch(&self, event: PageEvent) {
        let mut state = self.state.write().await;
        *state = reduce(std::mem::take(&mut *state), event);
    }

    /// Applies a search completion, reporting whether it was still current
    async fn complete(&self, seq: u64, event: PageEvent) -> bool {
        let mut state = self.state.write().await;
        let current = state.accepts(seq);
        *state = reduce(std::mem::take(&mut *state), event);
        current
    }

    pub async fn snapshot(&self) -> PageState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> PageView {
        PageView::from(&*self.state.read().await)
    }

    /// Loads the trending list; called once at startup
    pub async fn mount(&self) -> usize {
        let records = self.trending.run().await;
        let loaded = records.len();
        self.dispatch(PageEvent::TrendingLoaded(records)).await;
        loaded
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        self.dispatch(PageEvent::QueryChanged(query.into())).await;
    }

    pub async fn select_genre(&self, genre: GenreToken) {
        self.dispatch(PageEvent::GenreSelected(genre)).await;
    }

    /// Keyboard path: only `SUBMIT_KEY` triggers a search
    pub async fn key_down(&self, key: &str) -> AppResult<SearchOutcome> {
        if key == SUBMIT_KEY {
            self.submit().await
        } else {
            Ok(SearchOutcome::Ignored)
        }
    }

    /// Searches for the current query text
    ///
    /// A failure of the current search moves the page to Empty and is also
    /// returned; failures of superseded searches are only logged.
    pub async fn submit(&self) -> AppResult<SearchOutcome> {
        self.search(None).await
    }

    /// Replaces the query text and searches for exactly that text
    pub async fn submit_query(&self, raw: impl Into<String>) -> AppResult<SearchOutcome> {
        self.search(Some(raw.into())).await
    }

    /// Number of searches currently running through the pipeline
    pub fn searches_in_flight(&self) -> usize {
        self.pipeline.in_flight()
    }

    /// Stores the replacement query (if any) and starts a search for the
    /// stored text, all under one write lock. `None` for a blank query.
    async fn begin(&self, replacement: Option<String>) -> Option<(u64, SearchQuery)> {
        let mut state = self.state.write().await;
        if let Some(raw) = replacement {
            *state = reduce(std::mem::take(&mut *state), PageEvent::QueryChanged(raw));
        }

        let query = SearchQuery::parse(&state.query).ok()?;
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        *state = reduce(std::mem::take(&mut *state), PageEvent::SearchStarted { seq });
        Some((seq, query))
    }

    async fn search(&self, replacement: Option<String>) -> AppResult<SearchOutcome> {
        let Some((seq, query)) = self.begin(replacement).await else {
            tracing::debug!("Ignoring blank search");
            return Ok(SearchOutcome::Ignored);
        };

        // Runs detached so the page settles even if the caller is dropped
        let controller = self.clone();
        let task = tokio::spawn(async move { controller.settle(seq, query).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                let error = AppError::Internal(e.to_string());
                tracing::error!(seq, error = %error, "Search task failed");
                self.complete(
                    seq,
                    PageEvent::SearchFailed {
                        seq,
                        error: error.to_string(),
                    },
                )
                .await;
                Err(error)
            }
        }
    }

    /// Runs the pipeline and applies its completion for `seq`
    async fn settle(&self, seq: u64, query: SearchQuery) -> AppResult<SearchOutcome> {
        match self.pipeline.run(&query).await {
            Ok(records) => {
                let results = records.len();
                if self
                    .complete(seq, PageEvent::SearchSucceeded { seq, records })
                    .await
                {
                    Ok(SearchOutcome::Applied { results })
                } else {
                    tracing::debug!(seq, query = %query, "Discarding superseded search result");
                    Ok(SearchOutcome::Superseded)
                }
            }
            Err(e) => {
                tracing::error!(seq, query = %query, error = %e, "Search failed");
                let error = e.to_string();
                if self.complete(seq, PageEvent::SearchFailed { seq, error }).await {
                    Err(e)
                } else {
                    Ok(SearchOutcome::Superseded)
                }
            }
        }
    }

    /// Details for a record currently on the page, search results first
    pub async fn details(&self, title: &str) -> AppResult<MovieDetails> {
        let state = self.state.read().await;
        state
            .results
            .iter()
            .chain(state.trending.iter())
            .find(|record| record.title == title)
            .map(MovieDetails::from)
            .ok_or_else(|| AppError::NotFound(format!("No movie titled {:?} on the page", title)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;
    use crate::page::Phase;
    use crate::services::{
        providers::{
            MetadataProvider, MockMetadataProvider, MockRecommendationProvider,
            RecommendationProvider,
        },
        Enricher,
    };
    use std::time::Duration;

    struct EchoMetadata;

    #[async_trait::async_trait]
    impl MetadataProvider for EchoMetadata {
        async fn lookup(&self, title: &str) -> AppResult<MovieRecord> {
            Ok(MovieRecord {
                title: title.to_string(),
                genre: Some("Drama".to_string()),
                awards: "N/A".to_string(),
                found: true,
                ..Default::default()
            })
        }
    }

    /// Recommends the query back; "slow" takes longer than anything else
    struct EchoRecommender;

    #[async_trait::async_trait]
    impl RecommendationProvider for EchoRecommender {
        async fn recommend(&self, query: &SearchQuery) -> AppResult<Vec<String>> {
            if query.as_str() == "slow" {
                tokio::time::sleep(Duration::from_millis(150)).await;
            }
            Ok(vec![query.as_str().to_string()])
        }
    }

    fn controller(
        recommender: impl RecommendationProvider + 'static,
        metadata: impl MetadataProvider + 'static,
    ) -> DiscoveryController {
        let enricher = Enricher::new(Arc::new(metadata), 8);
        DiscoveryController::new(
            SearchPipeline::new(Arc::new(recommender), enricher.clone()),
            TrendingLoader::new(enricher),
        )
    }

    #[tokio::test]
    async fn test_blank_query_sends_nothing() {
        let mut recommender = MockRecommendationProvider::new();
        recommender.expect_recommend().never();
        let mut metadata = MockMetadataProvider::new();
        metadata.expect_lookup().never();

        let controller = controller(recommender, metadata);
        controller.set_query("   ").await;
        let before = controller.snapshot().await;

        assert_eq!(controller.submit().await.unwrap(), SearchOutcome::Ignored);
        assert_eq!(controller.key_down(SUBMIT_KEY).await.unwrap(), SearchOutcome::Ignored);
        assert_eq!(controller.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_enter_key_submits() {
        let controller = controller(EchoRecommender, EchoMetadata);
        controller.set_query("Heat").await;

        let outcome = controller.key_down(SUBMIT_KEY).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Applied { results: 1 });

        let state = controller.snapshot().await;
        assert_eq!(state.phase, Phase::Results);
        assert_eq!(state.results[0].title, "Heat");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_other_keys_are_ignored() {
        let mut recommender = MockRecommendationProvider::new();
        recommender.expect_recommend().never();

        let controller = controller(recommender, EchoMetadata);
        controller.set_query("Heat").await;

        assert_eq!(controller.key_down("a").await.unwrap(), SearchOutcome::Ignored);
        assert_eq!(controller.snapshot().await.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_failed_search_degrades_to_empty() {
        let mut recommender = MockRecommendationProvider::new();
        recommender
            .expect_recommend()
            .times(1)
            .returning(|_| Err(AppError::upstream_status("recommender", 500, "")));

        let controller = controller(recommender, EchoMetadata);
        controller.set_query("Inception").await;

        let err = controller.submit().await.unwrap_err();
        assert_eq!(err.upstream_code(), Some(500));

        let view = controller.view().await;
        assert_eq!(view.phase, Phase::Empty);
        assert!(!view.loading);
        assert!(view.error.is_some());
    }

    #[tokio::test]
    async fn test_latest_search_wins() {
        let controller = controller(EchoRecommender, EchoMetadata);

        controller.set_query("slow").await;
        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };

        while controller.snapshot().await.latest_search < 1 {
            tokio::task::yield_now().await;
        }

        controller.set_query("fast").await;
        let second = controller.submit().await.unwrap();
        assert_eq!(second, SearchOutcome::Applied { results: 1 });

        let first = first.await.unwrap().unwrap();
        assert_eq!(first, SearchOutcome::Superseded);

        let state = controller.snapshot().await;
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].title, "fast");
        assert!(!state.loading);
    }

    /// Echoes the query after a delay and records every query it was asked for
    struct RecordingRecommender {
        delay: Duration,
        seen: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl RecommendationProvider for RecordingRecommender {
        async fn recommend(&self, query: &SearchQuery) -> AppResult<Vec<String>> {
            self.seen.lock().unwrap().push(query.as_str().to_string());
            tokio::time::sleep(self.delay).await;
            Ok(vec![query.as_str().to_string()])
        }
    }

    impl RecordingRecommender {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay,
                seen: std::sync::Mutex::new(Vec::new()),
            })
        }
    }

    fn recording_controller(recommender: Arc<RecordingRecommender>) -> DiscoveryController {
        let enricher = Enricher::new(Arc::new(EchoMetadata), 8);
        DiscoveryController::new(
            SearchPipeline::new(recommender, enricher.clone()),
            TrendingLoader::new(enricher),
        )
    }

    #[tokio::test]
    async fn test_abandoned_submit_still_settles_page() {
        let recommender = RecordingRecommender::new(Duration::from_millis(100));
        let controller = recording_controller(recommender);
        controller.set_query("Heat").await;

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        while !controller.snapshot().await.loading {
            tokio::task::yield_now().await;
        }
        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        tokio::time::timeout(Duration::from_secs(2), async {
            while controller.snapshot().await.loading {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("page stayed in loading after the caller went away");

        let state = controller.snapshot().await;
        assert_eq!(state.phase, Phase::Results);
        assert_eq!(state.results[0].title, "Heat");
        assert_eq!(controller.searches_in_flight(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_submits_search_their_own_query() {
        let recommender = RecordingRecommender::new(Duration::from_millis(30));
        let controller = recording_controller(recommender.clone());

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit_query("slow").await })
        };
        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit_query("fast").await })
        };
        let outcomes = [first.await.unwrap().unwrap(), second.await.unwrap().unwrap()];

        let mut seen = recommender.seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec!["fast", "slow"]);

        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, SearchOutcome::Applied { .. }))
                .count(),
            1
        );

        let state = controller.snapshot().await;
        assert!(!state.loading);
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].title, state.query);
    }

    #[tokio::test]
    async fn test_submit_query_ignores_blank_text() {
        let mut recommender = MockRecommendationProvider::new();
        recommender.expect_recommend().never();

        let controller = controller(recommender, EchoMetadata);
        let outcome = controller.submit_query("   ").await.unwrap();
        assert_eq!(outcome, SearchOutcome::Ignored);

        let state = controller.snapshot().await;
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_mount_loads_trending() {
        let controller = controller(EchoRecommender, EchoMetadata);
        assert_eq!(controller.mount().await, 8);

        let view = controller.view().await;
        assert_eq!(view.phase, Phase::TrendingLoaded);
        assert_eq!(view.trending.map(|t| t.len()), Some(8));
    }

    #[tokio::test]
    async fn test_details_lookup() {
        let controller = controller(EchoRecommender, EchoMetadata);
        controller.mount().await;

        let details = controller.details("Fight Club").await.unwrap();
        assert_eq!(details.summary.title, "Fight Club");
        assert_eq!(details.awards, None);

        let missing = controller.details("Zardoz").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_genre_selection_filters_view() {
        let controller = controller(EchoRecommender, EchoMetadata);
        controller.mount().await;

        controller.select_genre(GenreToken::Comedy).await;
        let view = controller.view().await;
        assert_eq!(view.genre, GenreToken::Comedy);
        assert_eq!(view.trending.map(|t| t.len()), Some(0));
    }
}
