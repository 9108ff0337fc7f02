use super::error::PoiError;
use super::image::ImageResolver;
use super::provider::{PoiElement, PoiProvider};
use super::record::{ImageSlot, PoiDetail, PoiId, PoiRecord, Tags};
use crate::sdk::geo::Coordinate;
use crate::sdk::map::{MapSurface, Overlay, OverlayId};
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_POI_LABEL: &str = "Spot";

#[derive(Debug, Clone)]
pub struct PoiMarker {
    pub record: PoiRecord,
    pub detail: PoiDetail,
    overlay: OverlayId,
}

/// Image lookup taken out of the pipeline so it can run while other
/// detail views are opened.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub id: PoiId,
    pub name: String,
    pub tags: Tags,
    generation: u64,
}

/// Owns the POI markers of the current route and the shown-POI set.
pub struct PoiPipeline {
    provider: Arc<dyn PoiProvider>,
    resolver: ImageResolver,
    fallback_label: String,
    markers: Vec<PoiMarker>,
    shown: HashSet<PoiId>,
    generation: u64,
}

impl PoiPipeline {
    pub fn new(provider: Arc<dyn PoiProvider>, resolver: ImageResolver) -> Self {
        Self {
            provider,
            resolver,
            fallback_label: DEFAULT_POI_LABEL.to_string(),
            markers: Vec::new(),
            shown: HashSet::new(),
            generation: 0,
        }
    }

    pub fn with_fallback_label(mut self, label: impl Into<String>) -> Self {
        self.fallback_label = label.into();
        self
    }

    pub fn provider(&self) -> Arc<dyn PoiProvider> {
        Arc::clone(&self.provider)
    }

    /// Removes every POI marker and forgets which ids were shown.
    pub fn clear<M: MapSurface + ?Sized>(&mut self, map: &mut M) {
        for marker in self.markers.drain(..) {
            map.remove_overlay(marker.overlay);
        }
        self.shown.clear();
        self.generation += 1;
    }

    /// Clears, queries once for all samples, and renders what came back.
    /// Backend failures render nothing and are only logged.
    pub async fn refresh<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        samples: &[Coordinate],
    ) -> usize {
        self.clear(map);
        let outcome = self.provider.query(samples).await;
        self.ingest_outcome(map, outcome)
    }

    pub fn ingest_outcome<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        outcome: Result<Vec<PoiElement>, PoiError>,
    ) -> usize {
        match outcome {
            Ok(elements) => self.ingest(map, elements),
            Err(e) => {
                log::warn!("POI lookup failed, showing none: {}", e);
                0
            }
        }
    }

    /// Renders elements in the order received, at most once per id.
    pub fn ingest<M: MapSurface + ?Sized>(&mut self, map: &mut M, elements: Vec<PoiElement>) -> usize {
        let mut rendered = 0;
        for element in elements {
            let Some(position) = element.position() else {
                log::debug!("Skipping POI {} without a usable position", element.id);
                continue;
            };
            if !self.shown.insert(element.id) {
                continue;
            }

            let record = PoiRecord {
                id: element.id,
                position,
                tags: element.tags,
            };
            let detail = PoiDetail::for_record(&record, &self.fallback_label);
            let overlay = map.add_overlay(Overlay::Poi {
                position,
                label: detail.name.clone(),
            });
            self.markers.push(PoiMarker {
                record,
                detail,
                overlay,
            });
            rendered += 1;
        }
        log::info!(
            "Rendered {} new POIs ({} shown in total)",
            rendered,
            self.shown.len()
        );
        rendered
    }

    /// Marks the image slot as loading. `None` once the slot was ever touched.
    pub fn begin_image(&mut self, id: PoiId) -> Option<ImageRequest> {
        let generation = self.generation;
        let marker = self.markers.iter_mut().find(|m| m.record.id == id)?;
        if marker.detail.image != ImageSlot::Pending {
            return None;
        }
        marker.detail.image = ImageSlot::Loading;
        Some(ImageRequest {
            id,
            name: marker.detail.name.clone(),
            tags: marker.record.tags.clone(),
            generation,
        })
    }

    /// Stores the lookup result. Dropped if the markers were cleared meanwhile.
    pub fn finish_image(&mut self, request: &ImageRequest, url: Option<String>) -> bool {
        if request.generation != self.generation {
            log::debug!("Dropping image for POI {} from a cleared route", request.id);
            return false;
        }
        let Some(marker) = self.markers.iter_mut().find(|m| m.record.id == request.id) else {
            return false;
        };
        if marker.detail.image != ImageSlot::Loading {
            return false;
        }
        marker.detail.image = match url {
            Some(url) => ImageSlot::Loaded(url),
            None => ImageSlot::Empty,
        };
        true
    }

    /// Opens the detail view, fetching its image the first time only.
    pub async fn open_detail(&mut self, id: PoiId) -> Option<&PoiDetail> {
        if let Some(request) = self.begin_image(id) {
            let url = self.resolver.resolve(&request.name, &request.tags).await;
            self.finish_image(&request, url);
        }
        self.detail(id)
    }

    pub fn detail(&self, id: PoiId) -> Option<&PoiDetail> {
        self.markers
            .iter()
            .find(|m| m.record.id == id)
            .map(|m| &m.detail)
    }

    pub fn markers(&self) -> &[PoiMarker] {
        &self.markers
    }

    pub fn is_shown(&self, id: PoiId) -> bool {
        self.shown.contains(&id)
    }

    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }
}
