use super::error::SearchError;
use super::SearchSuggestion;
use crate::sdk::geo::Coordinate;
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const RESULT_LIMIT: u32 = 6;

#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Ranked matches for a free-text address query.
    async fn search(&self, query: &str) -> Result<Vec<SearchSuggestion>, SearchError>;
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
pub struct Place {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

impl Place {
    fn into_suggestion(self) -> Option<SearchSuggestion> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        let position = Coordinate::new(lat, lon).ok()?;
        Some(SearchSuggestion {
            display_name: self.display_name,
            position,
        })
    }
}

pub struct NominatimProvider {
    client: Client,
    base_url: String,
    limiter: Limiter,
}

impl NominatimProvider {
    pub fn new(client: Client, base_url: impl Into<String>, limiter: Limiter) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter,
        }
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchSuggestion>, SearchError> {
        let url = format!("{}/search", self.base_url);
        self.limiter.until_ready().await;
        log::debug!("[PROVIDER] Calling Nominatim search for \"{}\"", query);

        let limit = RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        read_places_response(status, text)
    }
}

pub(crate) fn read_places_response(
    status: StatusCode,
    text: String,
) -> Result<Vec<SearchSuggestion>, SearchError> {
    if !status.is_success() {
        return Err(SearchError::ApiError {
            status: status.as_u16(),
            body: text,
        });
    }
    parse_places(&text)
}

pub(crate) fn parse_places(text: &str) -> Result<Vec<SearchSuggestion>, SearchError> {
    let places: Vec<Place> = serde_json::from_str(text).map_err(|e| {
        log::error!("Failed to parse Nominatim response: {}. Body: {}", e, text);
        e
    })?;

    Ok(places
        .into_iter()
        .filter_map(|place| {
            let name = place.display_name.clone();
            let suggestion = place.into_suggestion();
            if suggestion.is_none() {
                log::warn!("Dropping search result with bad coordinates: {}", name);
            }
            suggestion
        })
        .collect())
}
