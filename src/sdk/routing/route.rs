use crate::sdk::geo::{Bounds, Coordinate};
use serde::Serialize;

/// One computed route, geometry in latitude-first order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub geometry: Vec<Coordinate>,
    pub distance_meters: f64,
}

impl RouteResult {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(&self.geometry)
    }
}
