use serde::Serialize;

use crate::models::{GenreToken, MovieRecord};

/// Where the discovery page is in its lifecycle
///
/// `Phase` tracks the search lifecycle, not which section is drawn: in `Empty`
/// the trending section is still shown when trending records exist. Section
/// visibility is decided by `PageView`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    TrendingLoaded,
    Searching,
    Results,
    Empty,
}

/// Everything the page renders from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub query: String,
    pub loading: bool,
    pub trending: Vec<MovieRecord>,
    pub results: Vec<MovieRecord>,
    pub genre: GenreToken,
    pub phase: Phase,
    /// Sequence number of the most recently started search
    pub latest_search: u64,
    pub last_error: Option<String>,
}

/// Discrete inputs to the page
#[derive(Debug, Clone)]
pub enum PageEvent {
    QueryChanged(String),
    TrendingLoaded(Vec<MovieRecord>),
    GenreSelected(GenreToken),
    SearchStarted { seq: u64 },
    SearchSucceeded { seq: u64, records: Vec<MovieRecord> },
    SearchFailed { seq: u64, error: String },
}

impl PageEvent {
    /// Sequence number for search completions
    fn completion_seq(&self) -> Option<u64> {
        match self {
            PageEvent::SearchSucceeded { seq, .. } | PageEvent::SearchFailed { seq, .. } => {
                Some(*seq)
            }
            _ => None,
        }
    }
}

impl PageState {
    /// Whether a completion with this sequence number would be applied
    pub fn accepts(&self, seq: u64) -> bool {
        seq == self.latest_search
    }
}

/// Pure transition function
///
/// Completions from any search other than the latest started one leave the
/// state unchanged.
pub fn reduce(state: PageState, event: PageEvent) -> PageState {
    if let Some(seq) = event.completion_seq() {
        if !state.accepts(seq) {
            return state;
        }
    }

    match event {
        PageEvent::QueryChanged(query) => PageState { query, ..state },
        PageEvent::GenreSelected(genre) => PageState { genre, ..state },
        PageEvent::TrendingLoaded(trending) => {
            let phase = if state.phase == Phase::Idle && !trending.is_empty() {
                Phase::TrendingLoaded
            } else {
                state.phase
            };
            PageState {
                trending,
                phase,
                ..state
            }
        }
        PageEvent::SearchStarted { seq } => PageState {
            loading: true,
            phase: Phase::Searching,
            latest_search: seq.max(state.latest_search),
            last_error: None,
            ..state
        },
        PageEvent::SearchSucceeded { records, .. } => {
            let phase = if records.is_empty() {
                Phase::Empty
            } else {
                Phase::Results
            };
            PageState {
                loading: false,
                results: records,
                phase,
                ..state
            }
        }
        PageEvent::SearchFailed { error, .. } => PageState {
            loading: false,
            results: Vec::new(),
            phase: Phase::Empty,
            last_error: Some(error),
            ..state
        },
    }
}
