use serde::Deserialize;

// --- Data Structures for parsing OSRM responses ---

#[derive(Deserialize, Debug)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Deserialize, Debug)]
pub struct Route {
    pub geometry: LineString,
    pub distance: f64,
}

/// GeoJSON line string, `[lon, lat]` pairs.
#[derive(Deserialize, Debug)]
pub struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}
