use super::types::DirectionsResponse;
use crate::sdk::geo::Coordinate;
use crate::sdk::routing::error::{OsrmErrorPayload, RoutingError};
use crate::sdk::routing::route::RouteResult;
use crate::sdk::routing::service::RoutingProvider;
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

const NO_ROUTE_CODE: &str = "NoRoute";

/// Routing backend speaking the OSRM `route` service with the foot profile.
pub struct OsrmProvider {
    client: Client,
    base_url: String,
    limiter: Limiter,
}

impl OsrmProvider {
    pub fn new(client: Client, base_url: impl Into<String>, limiter: Limiter) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter,
        }
    }

    fn route_url(&self, points: &[Coordinate]) -> String {
        let coords = points
            .iter()
            .map(|p| format!("{},{}", p.longitude(), p.latitude()))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/route/v1/foot/{}?overview=full&geometries=geojson",
            self.base_url, coords
        )
    }
}

#[async_trait]
impl RoutingProvider for OsrmProvider {
    async fn route(&self, points: &[Coordinate]) -> Result<RouteResult, RoutingError> {
        if points.len() < 2 {
            return Err(RoutingError::NotEnoughPoints(points.len()));
        }

        let url = self.route_url(points);
        self.limiter.until_ready().await;
        log::debug!(
            "[PROVIDER] Calling OSRM route for {} points: {}",
            points.len(),
            url
        );

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                log::error!("Failed to send GET request. URL: {}\nError: {}", url, e);
                return Err(e.into());
            }
        };

        let status = response.status();
        let text = response.text().await?;

        read_route_response(status, &text).map_err(|e| {
            if let RoutingError::ParseError(ref err) = e {
                log::error!(
                    "Failed to parse DirectionsResponse. URL: {}\nError: {}. Body: {}",
                    url,
                    err,
                    text
                );
            }
            e
        })
    }
}

/// Error payload on a non-success status, directions otherwise.
pub(crate) fn read_route_response(status: StatusCode, text: &str) -> Result<RouteResult, RoutingError> {
    if !status.is_success() {
        return Err(parse_error_body(status.as_u16(), text));
    }
    parse_directions(text)
}

fn parse_error_body(status: u16, text: &str) -> RoutingError {
    // Try to parse the structured error first
    match serde_json::from_str::<OsrmErrorPayload>(text) {
        Ok(payload) if payload.code == NO_ROUTE_CODE => RoutingError::RouteNotFound,
        Ok(payload) => RoutingError::ApiError {
            code: payload.code,
            message: payload.message,
        },
        Err(_) => {
            log::error!(
                "API returned non-success status: {}. Unparseable Body: {}",
                status,
                text
            );
            RoutingError::RawApiError {
                status,
                body: text.to_string(),
            }
        }
    }
}

/// Picks the first candidate of a successful reply and flips it to lat/lon.
pub(crate) fn parse_directions(text: &str) -> Result<RouteResult, RoutingError> {
    let response: DirectionsResponse = serde_json::from_str(text)?;
    if response.code.as_deref() == Some(NO_ROUTE_CODE) {
        return Err(RoutingError::RouteNotFound);
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(RoutingError::RouteNotFound)?;

    let geometry = route
        .geometry
        .coordinates
        .into_iter()
        .map(Coordinate::from_lon_lat)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RouteResult {
        geometry,
        distance_meters: route.distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::util::rate_limit::per_minute;
    use assert_matches::assert_matches;

    #[test]
    fn url_lists_points_longitude_first_in_order() {
        let provider = OsrmProvider::new(Client::new(), "https://osrm.test/", per_minute(60));
        let points = [
            Coordinate::new(35.681, 139.767).unwrap(),
            Coordinate::new(35.685, 139.768).unwrap(),
            Coordinate::new(35.69, 139.77).unwrap(),
        ];
        assert_eq!(
            provider.route_url(&points),
            "https://osrm.test/route/v1/foot/139.767,35.681;139.768,35.685;139.77,35.69\
             ?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn selects_first_candidate() {
        let body = r#"{
            "code": "Ok",
            "routes": [
                {"distance": 1234.5, "geometry": {"type": "LineString", "coordinates": [[139.767, 35.681], [139.770, 35.690]]}},
                {"distance": 999.0, "geometry": {"type": "LineString", "coordinates": [[139.0, 35.0]]}}
            ]
        }"#;
        let route = parse_directions(body).unwrap();
        assert_eq!(route.distance_meters, 1234.5);
        assert_eq!(
            route.geometry,
            vec![
                Coordinate::new(35.681, 139.767).unwrap(),
                Coordinate::new(35.690, 139.770).unwrap()
            ]
        );
    }

    #[test]
    fn zero_candidates_is_route_not_found() {
        assert_matches!(
            parse_directions(r#"{"code": "Ok", "routes": []}"#),
            Err(RoutingError::RouteNotFound)
        );
        assert_matches!(
            parse_directions(r#"{"code": "Ok"}"#),
            Err(RoutingError::RouteNotFound)
        );
        assert_matches!(
            parse_error_body(400, r#"{"code": "NoRoute", "message": "Impossible route"}"#),
            RoutingError::RouteNotFound
        );
    }

    #[test]
    fn malformed_bodies_are_request_errors() {
        let err = parse_directions("<html>busy</html>").unwrap_err();
        assert_matches!(err, RoutingError::ParseError(_));
        assert!(err.is_request_error());

        let err = parse_directions(
            r#"{"routes": [{"distance": 1.0, "geometry": {"coordinates": [[35.0, 139.0]]}}]}"#,
        )
        .unwrap_err();
        assert_matches!(err, RoutingError::InvalidGeometry(_));

        let err = parse_error_body(400, r#"{"code": "InvalidQuery", "message": "bad"}"#);
        assert_matches!(err, RoutingError::ApiError { ref code, .. } if code == "InvalidQuery");
        assert_matches!(
            parse_error_body(502, "Bad Gateway"),
            RoutingError::RawApiError { status: 502, .. }
        );
    }

    #[tokio::test]
    async fn single_point_is_rejected_before_any_request() {
        let provider = OsrmProvider::new(Client::new(), "http://127.0.0.1:9", per_minute(60));
        let only = [Coordinate::new(35.0, 139.0).unwrap()];
        assert_matches!(
            provider.route(&only).await,
            Err(RoutingError::NotEnoughPoints(1))
        );
    }

    #[test]
    fn response_status_decides_between_error_payload_and_directions() {
        let ok = r#"{"code": "Ok", "routes": [{"distance": 812.0,
            "geometry": {"coordinates": [[139.767, 35.681], [139.768, 35.684]]}}]}"#;
        let route = read_route_response(StatusCode::OK, ok).unwrap();
        assert_eq!(route.geometry.len(), 2);

        assert_matches!(
            read_route_response(StatusCode::BAD_REQUEST, r#"{"code": "NoRoute", "message": "none"}"#),
            Err(RoutingError::RouteNotFound)
        );
        assert_matches!(
            read_route_response(StatusCode::TOO_MANY_REQUESTS, r#"{"code": "TooBig", "message": "too many"}"#),
            Err(RoutingError::ApiError { ref code, ref message }) if code == "TooBig" && message == "too many"
        );
        assert_matches!(
            read_route_response(StatusCode::BAD_GATEWAY, "upstream down"),
            Err(RoutingError::RawApiError { status: 502, ref body }) if body == "upstream down"
        );
    }
}
