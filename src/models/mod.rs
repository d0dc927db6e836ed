use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

pub mod card;

pub use card::{MovieDetails, MovieSummary};

/// Ordered, enriched records produced by one search invocation
pub type PipelineResult = Vec<MovieRecord>;

// ============================================================================
// Metadata Service Types
// ============================================================================

/// Movie metadata as returned by the metadata service
///
/// Field names follow the provider's wire format. Every field is optional on
/// the wire: a "not found" reply carries only `Response` and `Error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MovieRecord {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    /// Comma-delimited, e.g. "Crime, Drama, Thriller"
    #[serde(rename = "Genre", default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Language", default)]
    pub language: String,
    #[serde(rename = "imdbRating", default)]
    pub rating: String,
    #[serde(rename = "imdbVotes", default)]
    pub votes: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Actors", default)]
    pub cast: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Awards", default)]
    pub awards: String,
    /// Provider success flag ("True"/"False" on the wire)
    #[serde(rename = "Response", default, with = "provider_flag")]
    pub found: bool,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MovieRecord {
    /// Case-insensitive substring match against the genre field
    pub fn genre_contains(&self, token: &str) -> bool {
        self.genre
            .as_deref()
            .map(|genre| genre.to_lowercase().contains(&token.to_lowercase()))
            .unwrap_or(false)
    }
}

mod provider_flag {
    use super::*;

    pub fn serialize<S: Serializer>(found: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *found { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Text(String),
            Bool(bool),
        }

        Ok(match Flag::deserialize(deserializer)? {
            Flag::Text(text) => text.eq_ignore_ascii_case("true"),
            Flag::Bool(b) => b,
        })
    }
}

/// Response body of `POST /recommend`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationList {
    pub recommendations: Vec<String>,
}

// ============================================================================
// Search Inputs
// ============================================================================

/// A trimmed, non-empty free-text query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Rejects empty or whitespace-only input
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "Search query cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Genre selector offered on the discovery page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenreToken {
    /// Identity filter
    #[default]
    All,
    Action,
    Adventure,
    Comedy,
    Drama,
    Horror,
    Romance,
    #[serde(rename = "sci-fi")]
    SciFi,
    Thriller,
}

impl GenreToken {
    /// Every token in display order
    pub const ALL: [GenreToken; 9] = [
        GenreToken::All,
        GenreToken::Action,
        GenreToken::Adventure,
        GenreToken::Comedy,
        GenreToken::Drama,
        GenreToken::Horror,
        GenreToken::Romance,
        GenreToken::SciFi,
        GenreToken::Thriller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenreToken::All => "all",
            GenreToken::Action => "action",
            GenreToken::Adventure => "adventure",
            GenreToken::Comedy => "comedy",
            GenreToken::Drama => "drama",
            GenreToken::Horror => "horror",
            GenreToken::Romance => "romance",
            GenreToken::SciFi => "sci-fi",
            GenreToken::Thriller => "thriller",
        }
    }

    /// Button label: first character upper-cased ("Sci-fi")
    pub fn label(&self) -> String {
        let token = self.as_str();
        let mut chars = token.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Display for GenreToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GenreToken {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        GenreToken::ALL
            .into_iter()
            .find(|token| token.as_str() == wanted)
            .ok_or_else(|| AppError::Validation(format!("Unknown genre: {}", s)))
    }
}
