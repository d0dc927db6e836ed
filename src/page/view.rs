use serde::Serialize;

use super::state::{PageState, Phase};
use crate::{
    models::{GenreToken, MovieRecord, MovieSummary},
    services::genre_filter,
};

pub const EMPTY_PROMPT: &str = "Search for movies to get personalized recommendations";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreOption {
    pub token: GenreToken,
    pub label: String,
    pub selected: bool,
}

/// Render-ready projection of `PageState`
///
/// A section that should not be drawn is `None` rather than empty.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageView {
    pub phase: Phase,
    pub query: String,
    pub loading: bool,
    pub genre: GenreToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<GenreOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trending: Option<Vec<MovieSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<MovieSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_prompt: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&PageState> for PageView {
    fn from(state: &PageState) -> Self {
        let summaries = |records: &[MovieRecord]| {
            genre_filter::apply(records, state.genre)
                .iter()
                .map(MovieSummary::from)
                .collect::<Vec<_>>()
        };

        let has_results = !state.results.is_empty();
        let has_trending = !state.trending.is_empty();

        let trending =
            (has_trending && !has_results).then(|| summaries(state.trending.as_slice()));
        let results =
            (!state.loading && has_results).then(|| summaries(state.results.as_slice()));

        let genres = (has_results || has_trending).then(|| {
            GenreToken::ALL
                .into_iter()
                .map(|token| GenreOption {
                    token,
                    label: token.label(),
                    selected: token == state.genre,
                })
                .collect()
        });

        let empty_prompt =
            (!state.loading && !has_results && !has_trending).then_some(EMPTY_PROMPT);

        Self {
            phase: state.phase,
            query: state.query.clone(),
            loading: state.loading,
            genre: state.genre,
            genres,
            trending,
            results,
            empty_prompt,
            error: state.last_error.clone(),
        }
    }
}
