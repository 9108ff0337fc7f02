use super::error::RoutingError;
use super::route::RouteResult;
use crate::sdk::geo::Coordinate;
use async_trait::async_trait;

#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Computes a walking route through `points` in the given order.
    async fn route(&self, points: &[Coordinate]) -> Result<RouteResult, RoutingError>;
}
