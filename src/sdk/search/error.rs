use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Geocoding backend returned HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}
