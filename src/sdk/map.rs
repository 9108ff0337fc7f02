// Boundary with the map widget and the toast area. The planner only talks to
// these traits; rendering itself lives outside the crate.
use super::geo::{Bounds, Coordinate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct OverlayId(u64);

/// Icon classes for the three placement roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Play,
    FlagCheckered,
    LocationDot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    Marker { position: Coordinate, icon: Icon },
    Poi { position: Coordinate, label: String },
    Route { geometry: Vec<Coordinate> },
}

pub trait MapSurface {
    fn add_overlay(&mut self, overlay: Overlay) -> OverlayId;

    /// Removing an unknown id does nothing.
    fn remove_overlay(&mut self, id: OverlayId);

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32);

    fn set_view(&mut self, center: Coordinate, zoom: u8);

    /// Enables or disables the "compute route" control.
    fn set_compute_enabled(&mut self, enabled: bool);

    fn set_loading(&mut self, loading: bool);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Viewport {
    Fitted { bounds: Bounds, padding_px: u32 },
    Centered { center: Coordinate, zoom: u8 },
}

/// Headless map surface that only records what would be drawn.
#[derive(Debug, Default)]
pub struct InMemoryMap {
    overlays: BTreeMap<OverlayId, Overlay>,
    next_id: u64,
    viewport: Option<Viewport>,
    compute_enabled: bool,
    loading: bool,
}

impl InMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn routes(&self) -> Vec<&[Coordinate]> {
        self.overlays
            .values()
            .filter_map(|o| match o {
                Overlay::Route { geometry } => Some(geometry.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn poi_labels(&self) -> Vec<&str> {
        self.overlays
            .values()
            .filter_map(|o| match o {
                Overlay::Poi { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn markers_with_icon(&self, icon: Icon) -> Vec<Coordinate> {
        self.overlays
            .values()
            .filter_map(|o| match o {
                Overlay::Marker { position, icon: i } if *i == icon => Some(*position),
                _ => None,
            })
            .collect()
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn compute_enabled(&self) -> bool {
        self.compute_enabled
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

impl MapSurface for InMemoryMap {
    fn add_overlay(&mut self, overlay: Overlay) -> OverlayId {
        self.next_id += 1;
        let id = OverlayId(self.next_id);
        self.overlays.insert(id, overlay);
        id
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.remove(&id);
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        self.viewport = Some(Viewport::Fitted { bounds, padding_px });
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.viewport = Some(Viewport::Centered { center, zoom });
    }

    fn set_compute_enabled(&mut self, enabled: bool) {
        self.compute_enabled = enabled;
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info(String),
    Error(String),
}

/// Transient toast-style messages for the user.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Sends notifications to the log, for headless use.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::Info(m) => log::info!("{}", m),
            Notification::Error(m) => log::warn!("{}", m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut map = InMemoryMap::new();
        let p = Coordinate::new(35.0, 139.0).unwrap();
        let a = map.add_overlay(Overlay::Marker {
            position: p,
            icon: Icon::Play,
        });
        map.remove_overlay(a);
        let b = map.add_overlay(Overlay::Marker {
            position: p,
            icon: Icon::Play,
        });
        assert_ne!(a, b);
        assert_eq!(map.overlay_count(), 1);
        map.remove_overlay(a);
        assert_eq!(map.overlay_count(), 1);
    }
}
