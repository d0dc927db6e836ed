//! Genre narrowing for rendered record lists.

use crate::models::{GenreToken, MovieRecord};

/// Returns the records whose genre field contains `token`, case-insensitively.
///
/// `GenreToken::All` passes everything through. Records without a genre are
/// excluded by any other token. Order is preserved and the input is untouched.
pub fn apply(records: &[MovieRecord], token: GenreToken) -> Vec<MovieRecord> {
    match token {
        GenreToken::All => records.to_vec(),
        token => records
            .iter()
            .filter(|record| record.genre_contains(token.as_str()))
            .cloned()
            .collect(),
    }
}
