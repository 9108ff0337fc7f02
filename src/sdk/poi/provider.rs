use super::error::PoiError;
use super::record::{PoiId, Tags};
use crate::sdk::geo::Coordinate;
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const DEFAULT_RADIUS_M: u32 = 60;
pub const DEFAULT_TIMEOUT_S: u32 = 25;

/// Raw element of a POI query, before dedup.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PoiElement {
    /// Read from the element's `type` and `id` fields.
    #[serde(flatten)]
    pub id: PoiId,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Ways and relations come back with a center instead of lat/lon.
    #[serde(default)]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: Tags,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl PoiElement {
    pub fn position(&self) -> Option<Coordinate> {
        let (lat, lon) = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => (lat, lon),
            (_, _, Some(center)) => (center.lat, center.lon),
            _ => return None,
        };
        Coordinate::new(lat, lon).ok()
    }
}

#[derive(Deserialize, Debug)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<PoiElement>,
}

#[async_trait]
pub trait PoiProvider: Send + Sync {
    /// One request covering every sample point.
    async fn query(&self, samples: &[Coordinate]) -> Result<Vec<PoiElement>, PoiError>;
}

/// POI backend backed by an Overpass API interpreter endpoint.
pub struct OverpassProvider {
    client: Client,
    url: String,
    radius_m: u32,
    timeout_s: u32,
    limiter: Limiter,
}

impl OverpassProvider {
    pub fn new(client: Client, url: impl Into<String>, radius_m: u32, limiter: Limiter) -> Self {
        Self {
            client,
            url: url.into(),
            radius_m,
            timeout_s: DEFAULT_TIMEOUT_S,
            limiter,
        }
    }
}

#[async_trait]
impl PoiProvider for OverpassProvider {
    async fn query(&self, samples: &[Coordinate]) -> Result<Vec<PoiElement>, PoiError> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }
        let query = build_query(samples, self.radius_m, self.timeout_s);

        self.limiter.until_ready().await;
        log::debug!(
            "[PROVIDER] Calling Overpass for {} sample points",
            samples.len()
        );

        let response = self.client.post(&self.url).body(query).send().await?;
        let status = response.status();
        let text = response.text().await?;
        read_elements_response(status, text)
    }
}

pub(crate) fn read_elements_response(status: StatusCode, text: String) -> Result<Vec<PoiElement>, PoiError> {
    if !status.is_success() {
        return Err(PoiError::ApiError {
            status: status.as_u16(),
            body: text,
        });
    }
    parse_elements(&text)
}

/// Overpass QL selecting tourism, historic and park nodes around every sample.
pub fn build_query(samples: &[Coordinate], radius_m: u32, timeout_s: u32) -> String {
    let mut body = String::new();
    for p in samples {
        let around = format!("around:{},{},{}", radius_m, p.latitude(), p.longitude());
        body.push_str(&format!(
            "node({around})[\"tourism\"];\nnode({around})[\"historic\"];\nnode({around})[\"leisure\"=\"park\"];\n"
        ));
    }
    format!("[out:json][timeout:{}];\n(\n{});\nout tags center;\n", timeout_s, body)
}

pub(crate) fn parse_elements(text: &str) -> Result<Vec<PoiElement>, PoiError> {
    let response: OverpassResponse = serde_json::from_str(text).map_err(|e| {
        log::error!("Failed to parse Overpass response: {}. Body: {}", e, text);
        e
    })?;
    Ok(response.elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::poi::record::ElementKind;
    use assert_matches::assert_matches;

    #[test]
    fn query_covers_every_sample_with_three_filters() {
        let samples = [
            Coordinate::new(35.681, 139.767).unwrap(),
            Coordinate::new(35.69, 139.77).unwrap(),
        ];
        let q = build_query(&samples, 60, 25);
        assert!(q.starts_with("[out:json][timeout:25];"));
        assert!(q.trim_end().ends_with("out tags center;"));
        assert!(q.contains("node(around:60,35.681,139.767)[\"tourism\"];"));
        assert!(q.contains("node(around:60,35.69,139.77)[\"historic\"];"));
        assert!(q.contains("node(around:60,35.69,139.77)[\"leisure\"=\"park\"];"));
        assert_eq!(q.matches("node(").count(), 6);
    }

    #[test]
    fn parses_nodes_and_centers() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 35.68, "lon": 139.76, "tags": {"name": "A", "tourism": "museum"}},
                {"type": "way", "id": 2, "center": {"lat": 35.69, "lon": 139.77}},
                {"type": "node", "id": 3}
            ]
        }"#;
        let elements = parse_elements(body).unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].tags.get("name").map(String::as_str), Some("A"));
        assert_eq!(
            elements[1].position(),
            Some(Coordinate::new(35.69, 139.77).unwrap())
        );
        assert!(elements[1].tags.is_empty());
        assert_eq!(elements[2].position(), None);
    }

    #[test]
    fn element_type_is_part_of_the_id() {
        let body = r#"{"elements": [
            {"type": "node", "id": 5, "lat": 35.0, "lon": 139.0},
            {"type": "way", "id": 5, "center": {"lat": 35.01, "lon": 139.01}},
            {"type": "relation", "id": 5, "center": {"lat": 35.02, "lon": 139.02}},
            {"id": 6, "lat": 35.0, "lon": 139.0}
        ]}"#;
        let ids: Vec<PoiId> = parse_elements(body).unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(
            ids,
            vec![
                PoiId::node(5),
                PoiId::way(5),
                PoiId::new(ElementKind::Relation, 5),
                PoiId::node(6)
            ]
        );
        assert_eq!(PoiId::way(5).to_string(), "way/5");
    }

    #[test]
    fn out_of_range_position_is_unusable() {
        let element = PoiElement {
            id: PoiId::node(1),
            lat: Some(135.0),
            lon: Some(35.0),
            center: None,
            tags: Tags::new(),
        };
        assert_eq!(element.position(), None);
    }

    #[test]
    fn missing_elements_field_is_empty() {
        assert!(parse_elements("{}").unwrap().is_empty());
    }

    #[test]
    fn non_success_status_keeps_the_body() {
        assert_matches!(
            read_elements_response(StatusCode::TOO_MANY_REQUESTS, "rate limited".to_string()),
            Err(PoiError::ApiError { status: 429, ref body }) if body == "rate limited"
        );
        assert_matches!(
            read_elements_response(StatusCode::OK, "<html/>".to_string()),
            Err(PoiError::ParseError(_))
        );
        let elements = read_elements_response(
            StatusCode::OK,
            r#"{"elements": [{"type": "node", "id": 1, "lat": 35.0, "lon": 139.0}]}"#.to_string(),
        )
        .unwrap();
        assert_eq!(elements.len(), 1);
    }
}
