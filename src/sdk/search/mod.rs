pub mod autocomplete;
pub mod error;
pub mod provider;

use crate::sdk::geo::Coordinate;
use serde::Serialize;

pub use autocomplete::{InputOutcome, SearchAutocomplete};
pub use error::SearchError;
pub use provider::{GeocodingProvider, NominatimProvider};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSuggestion {
    pub display_name: String,
    pub position: Coordinate,
}

impl SearchSuggestion {
    /// Text before the first comma, kept in the search box after a selection.
    pub fn short_name(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }
}
