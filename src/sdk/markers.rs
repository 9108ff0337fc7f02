use super::geo::Coordinate;
use super::map::{Icon, MapSurface, Overlay, OverlayId};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Start,
    Goal,
    Waypoint,
}

impl Role {
    pub fn icon(self) -> Icon {
        match self {
            Role::Start => Icon::Play,
            Role::Goal => Icon::FlagCheckered,
            Role::Waypoint => Icon::LocationDot,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub role: Role,
    pub position: Coordinate,
    overlay: OverlayId,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Both a start and a goal marker are required")]
pub struct RouteNotReady;

/// Owns the start, goal and waypoint markers together with their overlays.
#[derive(Debug, Default)]
pub struct MarkerStore {
    start: Option<Marker>,
    goal: Option<Marker>,
    waypoints: Vec<Marker>,
    next_id: u64,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start and goal are replaced; waypoints are appended in click order.
    pub fn place_marker<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        position: Coordinate,
        role: Role,
    ) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        let overlay = map.add_overlay(Overlay::Marker {
            position,
            icon: role.icon(),
        });
        let marker = Marker {
            id,
            role,
            position,
            overlay,
        };
        log::debug!("Placing {:?} marker at {}", role, position);

        match role {
            Role::Start => {
                if let Some(old) = self.start.replace(marker) {
                    map.remove_overlay(old.overlay);
                }
            }
            Role::Goal => {
                if let Some(old) = self.goal.replace(marker) {
                    map.remove_overlay(old.overlay);
                }
            }
            Role::Waypoint => self.waypoints.push(marker),
        }
        id
    }

    /// Returns `false` when no waypoint has this id.
    pub fn remove_waypoint<M: MapSurface + ?Sized>(&mut self, map: &mut M, id: MarkerId) -> bool {
        match self.waypoints.iter().position(|w| w.id == id) {
            Some(index) => {
                let removed = self.waypoints.remove(index);
                map.remove_overlay(removed.overlay);
                true
            }
            None => false,
        }
    }

    pub fn clear_all<M: MapSurface + ?Sized>(&mut self, map: &mut M) {
        let markers = self
            .start
            .take()
            .into_iter()
            .chain(self.goal.take())
            .chain(self.waypoints.drain(..));
        for marker in markers {
            map.remove_overlay(marker.overlay);
        }
    }

    pub fn is_route_ready(&self) -> bool {
        self.start.is_some() && self.goal.is_some()
    }

    /// `[start, waypoints..., goal]`.
    pub fn ordered_route_points(&self) -> Result<Vec<Coordinate>, RouteNotReady> {
        let (start, goal) = match (&self.start, &self.goal) {
            (Some(start), Some(goal)) => (start, goal),
            _ => return Err(RouteNotReady),
        };
        let mut points = Vec::with_capacity(self.waypoints.len() + 2);
        points.push(start.position);
        points.extend(self.waypoints.iter().map(|w| w.position));
        points.push(goal.position);
        Ok(points)
    }

    pub fn start(&self) -> Option<&Marker> {
        self.start.as_ref()
    }

    pub fn goal(&self) -> Option<&Marker> {
        self.goal.as_ref()
    }

    pub fn waypoints(&self) -> &[Marker] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len() + self.start.is_some() as usize + self.goal.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
