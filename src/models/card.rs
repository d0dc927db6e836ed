use serde::Serialize;

use super::MovieRecord;

/// Provider placeholder for absent values
const NOT_AVAILABLE: &str = "N/A";

/// Card face shown in the movie grid
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieSummary {
    pub title: String,
    pub poster: String,
    pub rating: String,
    pub votes: String,
    pub runtime: String,
    pub year: String,
    pub language: String,
}

/// Details modal opened from a card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    pub plot: String,
    pub director: String,
    pub cast: String,
    pub genre: Option<String>,
    pub released: String,
    /// Omitted when the provider reports no awards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<String>,
}

impl From<&MovieRecord> for MovieSummary {
    fn from(record: &MovieRecord) -> Self {
        Self {
            title: record.title.clone(),
            poster: record.poster.clone(),
            rating: record.rating.clone(),
            votes: format_votes(&record.votes),
            runtime: record.runtime.clone(),
            year: record.year.clone(),
            language: record.language.clone(),
        }
    }
}

impl From<&MovieRecord> for MovieDetails {
    fn from(record: &MovieRecord) -> Self {
        let awards = match record.awards.trim() {
            "" | NOT_AVAILABLE => None,
            text => Some(text.to_string()),
        };

        Self {
            summary: MovieSummary::from(record),
            plot: record.plot.clone(),
            director: record.director.clone(),
            cast: record.cast.clone(),
            genre: record.genre.clone(),
            released: record.released.clone(),
            awards,
        }
    }
}

/// Renders a provider vote count ("2345678" or "2,345,678") with thousands separators
pub fn format_votes(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    let count = match digits.trim().parse::<u64>() {
        Ok(count) => count,
        Err(_) => return NOT_AVAILABLE.to_string(),
    };

    let plain = count.to_string();
    let mut out = String::with_capacity(plain.len() + plain.len() / 3);
    for (i, ch) in plain.chars().enumerate() {
        if i > 0 && (plain.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
