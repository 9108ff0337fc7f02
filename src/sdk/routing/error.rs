use crate::sdk::geo::CoordinateError;
use crate::sdk::markers::RouteNotReady;
use serde::Deserialize;
use thiserror::Error;

// Helper struct to parse the JSON error response from OSRM
#[derive(Deserialize, Debug)]
pub struct OsrmErrorPayload {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("No route was found between the selected points")]
    RouteNotFound,

    #[error("At least two points are required, got {0}")]
    NotEnoughPoints(usize),

    #[error(transparent)]
    NotReady(#[from] RouteNotReady),

    // Structured error returned by the routing backend
    #[error("API Error ({code}): {message}")]
    ApiError { code: String, message: String },

    // A fallback for when we get an error that isn't in the expected JSON format
    #[error("Unstructured API Error (HTTP {status}): {body}")]
    RawApiError { status: u16, body: String },

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Route geometry is invalid: {0}")]
    InvalidGeometry(#[from] CoordinateError),
}

impl RoutingError {
    /// Transport, HTTP or body failures, as opposed to "no route" or a caller mistake.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            RoutingError::ApiError { .. }
                | RoutingError::RawApiError { .. }
                | RoutingError::RequestError(_)
                | RoutingError::ParseError(_)
                | RoutingError::InvalidGeometry(_)
        )
    }
}
