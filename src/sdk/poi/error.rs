use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoiError {
    #[error("POI backend returned HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Failure of one step of the image lookup chain; never shown to the user.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Encyclopedia returned HTTP {0}")]
    Status(u16),

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}
