use crate::sdk::config::RecomputePolicy;
use crate::sdk::geo::Coordinate;
use crate::sdk::map::{MapSurface, Notification, Notifier, Overlay, OverlayId};
use crate::sdk::markers::{MarkerId, MarkerStore};
use crate::sdk::mode::{Mode, ModeController};
use crate::sdk::poi::{PoiDetail, PoiElement, PoiError, PoiId, PoiPipeline};
use crate::sdk::routing::{sample, RouteResult, RoutingError, RoutingProvider, DEFAULT_SAMPLE_STRIDE};
use crate::sdk::search::{SearchAutocomplete, SearchSuggestion};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Inset kept around the route when the viewport is fitted to it.
pub const ROUTE_PADDING_PX: u32 = 50;

/// A route request that has left the planner. Only the ticket of the latest
/// cycle is allowed to change what is on the map.
#[derive(Debug, Clone)]
pub struct RouteTicket {
    cycle: u64,
    pub points: Vec<Coordinate>,
}

#[derive(Debug, Clone)]
pub struct PoiTicket {
    cycle: u64,
    pub samples: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// Start or goal missing; nothing was requested.
    NotReady,
    /// A newer computation or a clear took over while this one was running.
    Stale,
    Computed { distance_meters: f64, pois: usize },
}

/// Result of a map click that placed a marker.
#[derive(Debug)]
pub struct Placement {
    pub marker: MarkerId,
    /// Set when the recompute policy triggered a route computation.
    pub route: Option<Result<RouteOutcome, RoutingError>>,
}

#[derive(Debug)]
struct DrawnRoute {
    result: RouteResult,
    overlay: OverlayId,
}

/// Session state for one map: markers, mode, current route and its POIs.
pub struct Planner<M: MapSurface, N: Notifier> {
    map: M,
    notifier: N,
    modes: ModeController,
    markers: MarkerStore,
    router: Arc<dyn RoutingProvider>,
    pois: PoiPipeline,
    policy: RecomputePolicy,
    stride: NonZeroUsize,
    route: Option<DrawnRoute>,
    cycle: u64,
}

impl<M: MapSurface, N: Notifier> Planner<M, N> {
    pub fn new(map: M, notifier: N, router: Arc<dyn RoutingProvider>, pois: PoiPipeline) -> Self {
        let mut planner = Self {
            map,
            notifier,
            modes: ModeController::new(),
            markers: MarkerStore::new(),
            router,
            pois,
            policy: RecomputePolicy::default(),
            stride: DEFAULT_SAMPLE_STRIDE,
            route: None,
            cycle: 0,
        };
        planner.map.set_compute_enabled(false);
        planner
    }

    pub fn with_policy(mut self, policy: RecomputePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_stride(mut self, stride: NonZeroUsize) -> Self {
        self.stride = stride;
        self
    }

    pub fn select_mode(&mut self, mode: Mode) {
        if self.modes.select(mode) && mode != Mode::None {
            self.notify_info(format!("{} placement mode: click the map", mode));
        }
    }

    /// Places a marker for the active mode. Ignored when no mode is selected.
    pub async fn click(&mut self, position: Coordinate) -> Option<Placement> {
        let role = self.modes.on_click()?;
        let marker = self.markers.place_marker(&mut self.map, position, role);
        let route = self.on_route_inputs_changed().await;
        Some(Placement { marker, route })
    }

    pub async fn remove_waypoint(&mut self, id: MarkerId) -> Option<Result<RouteOutcome, RoutingError>> {
        if !self.markers.remove_waypoint(&mut self.map, id) {
            return None;
        }
        self.on_route_inputs_changed().await
    }

    /// Runs after every marker change: refreshes the compute control and,
    /// under [`RecomputePolicy::Auto`], recomputes the route.
    pub async fn on_route_inputs_changed(&mut self) -> Option<Result<RouteOutcome, RoutingError>> {
        let ready = self.markers.is_route_ready();
        self.map.set_compute_enabled(ready);
        if ready && self.policy == RecomputePolicy::Auto {
            Some(self.compute_route().await)
        } else {
            None
        }
    }

    /// Requests a route through the current markers, draws it and loads its POIs.
    /// Failures are also reported through the notifier.
    pub async fn compute_route(&mut self) -> Result<RouteOutcome, RoutingError> {
        let Some(ticket) = self.begin_route() else {
            return Ok(RouteOutcome::NotReady);
        };
        let outcome = self.router.route(&ticket.points).await;
        let Some(poi_ticket) = self.finish_route(ticket, outcome)? else {
            return Ok(RouteOutcome::Stale);
        };

        let elements = self.pois.provider().query(&poi_ticket.samples).await;
        let distance_meters = self
            .route
            .as_ref()
            .map(|r| r.result.distance_meters)
            .unwrap_or_default();
        Ok(match self.finish_pois(poi_ticket, elements) {
            Some(pois) => RouteOutcome::Computed {
                distance_meters,
                pois,
            },
            None => RouteOutcome::Stale,
        })
    }

    /// Starts a new cycle. `None` (and no side effect) unless start and goal are set.
    pub fn begin_route(&mut self) -> Option<RouteTicket> {
        let points = self.markers.ordered_route_points().ok()?;
        self.cycle += 1;
        self.map.set_loading(true);
        log::debug!("Route cycle {} started with {} points", self.cycle, points.len());
        Some(RouteTicket {
            cycle: self.cycle,
            points,
        })
    }

    /// Applies a routing outcome. The previous route and POIs are only
    /// removed here, right before the new route is drawn.
    /// `Ok(None)` means the ticket was stale and the outcome was dropped.
    pub fn finish_route(
        &mut self,
        ticket: RouteTicket,
        outcome: Result<RouteResult, RoutingError>,
    ) -> Result<Option<PoiTicket>, RoutingError> {
        if ticket.cycle != self.cycle {
            log::debug!("Dropping outcome of stale route cycle {}", ticket.cycle);
            return Ok(None);
        }

        let route = match outcome {
            Ok(route) => route,
            Err(e) => {
                self.map.set_loading(false);
                let message = match &e {
                    RoutingError::RouteNotFound => "No route was found".to_string(),
                    other => format!("Route search failed: {}", other),
                };
                log::warn!("Route cycle {} failed: {}", ticket.cycle, e);
                self.notifier.notify(Notification::Error(message));
                return Err(e);
            }
        };

        self.remove_route();
        self.pois.clear(&mut self.map);
        let overlay = self.map.add_overlay(Overlay::Route {
            geometry: route.geometry.clone(),
        });
        if let Some(bounds) = route.bounds() {
            self.map.fit_bounds(bounds, ROUTE_PADDING_PX);
        }

        let samples = sample(&route.geometry, self.stride);
        log::info!(
            "Route cycle {}: {:.1} km, {} geometry points, {} POI samples",
            ticket.cycle,
            route.distance_km(),
            route.geometry.len(),
            samples.len()
        );
        self.route = Some(DrawnRoute {
            result: route,
            overlay,
        });
        Ok(Some(PoiTicket {
            cycle: ticket.cycle,
            samples,
        }))
    }

    /// Renders the POIs of a cycle and settles it. `None` if the cycle is stale.
    pub fn finish_pois(
        &mut self,
        ticket: PoiTicket,
        outcome: Result<Vec<PoiElement>, PoiError>,
    ) -> Option<usize> {
        if ticket.cycle != self.cycle {
            log::debug!("Dropping POIs of stale route cycle {}", ticket.cycle);
            return None;
        }
        let rendered = self.pois.ingest_outcome(&mut self.map, outcome);
        self.map.set_loading(false);
        if let Some(route) = &self.route {
            let message = format!("Route computed: distance {:.1} km", route.result.distance_km());
            self.notifier.notify(Notification::Info(message));
        }
        Some(rendered)
    }

    /// Full reset: markers, route, POIs and mode. In-flight cycles become stale.
    pub fn clear_all(&mut self) {
        self.markers.clear_all(&mut self.map);
        self.remove_route();
        self.pois.clear(&mut self.map);
        self.modes.reset();
        self.cycle += 1;
        self.map.set_loading(false);
        self.map.set_compute_enabled(false);
        self.notify_info("Map cleared".to_string());
    }

    pub async fn open_poi_detail(&mut self, id: PoiId) -> Option<&PoiDetail> {
        self.pois.open_detail(id).await
    }

    /// Recenters on a suggestion. The user still picks the marker role.
    pub fn select_suggestion(
        &mut self,
        autocomplete: &SearchAutocomplete,
        index: usize,
    ) -> Option<SearchSuggestion> {
        autocomplete.select(&mut self.map, index)
    }

    fn remove_route(&mut self) {
        if let Some(old) = self.route.take() {
            self.map.remove_overlay(old.overlay);
        }
    }

    fn notify_info(&mut self, message: String) {
        self.notifier.notify(Notification::Info(message));
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn pois(&self) -> &PoiPipeline {
        &self.pois
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref().map(|r| &r.result)
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
