use crate::sdk::config::PlannerConfig;
use crate::sdk::map::{MapSurface, Notifier};
use crate::sdk::planner::Planner;
use crate::sdk::poi::{
    EncyclopediaProvider, ImageResolver, OverpassProvider, PoiPipeline, PoiProvider,
    WikipediaProvider,
};
use crate::sdk::routing::{OsrmProvider, RoutingProvider};
use crate::sdk::search::{GeocodingProvider, NominatimProvider, SearchAutocomplete};
use crate::sdk::util::http::build_client;
use crate::sdk::util::rate_limit::{per_minute, per_second, NOMINATIM_PER_SECOND};
use std::sync::Arc;

const WIKIPEDIA_PER_SECOND: u32 = 5;

/// The four HTTP backends sharing one client, each behind its own limiter.
#[derive(Clone)]
pub struct Backends {
    pub router: Arc<dyn RoutingProvider>,
    pub pois: Arc<dyn PoiProvider>,
    pub encyclopedia: Arc<dyn EncyclopediaProvider>,
    pub geocoder: Arc<dyn GeocodingProvider>,
    config: PlannerConfig,
}

impl Backends {
    pub fn from_config(config: &PlannerConfig) -> reqwest::Result<Self> {
        let client = build_client(&config.user_agent)?;
        log::debug!(
            "Backends: OSRM {}, Overpass {}, Nominatim {}, Wikipedia {}",
            config.osrm_url,
            config.overpass_url,
            config.nominatim_url,
            config.wikipedia_url
        );

        Ok(Self {
            router: Arc::new(OsrmProvider::new(
                client.clone(),
                config.osrm_url.clone(),
                per_minute(config.osrm_per_minute),
            )),
            pois: Arc::new(OverpassProvider::new(
                client.clone(),
                config.overpass_url.clone(),
                config.poi_radius_m,
                per_minute(config.overpass_per_minute),
            )),
            encyclopedia: Arc::new(WikipediaProvider::new(
                client.clone(),
                config.wikipedia_url.clone(),
                per_second(WIKIPEDIA_PER_SECOND),
            )),
            geocoder: Arc::new(NominatimProvider::new(
                client,
                config.nominatim_url.clone(),
                per_second(NOMINATIM_PER_SECOND),
            )),
            config: config.clone(),
        })
    }

    pub fn planner<M: MapSurface, N: Notifier>(&self, map: M, notifier: N) -> Planner<M, N> {
        let pipeline = PoiPipeline::new(
            Arc::clone(&self.pois),
            ImageResolver::new(Arc::clone(&self.encyclopedia)),
        )
        .with_fallback_label(self.config.poi_label.clone());

        Planner::new(map, notifier, Arc::clone(&self.router), pipeline)
            .with_policy(self.config.recompute)
            .with_stride(self.config.sample_stride)
    }

    pub fn autocomplete(&self) -> SearchAutocomplete {
        SearchAutocomplete::new(Arc::clone(&self.geocoder)).with_debounce(self.config.debounce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::config::RecomputePolicy;
    use crate::sdk::map::{InMemoryMap, LogNotifier};
    use crate::sdk::mode::Mode;

    #[test]
    fn planner_starts_empty_with_compute_disabled() {
        let config = PlannerConfig {
            recompute: RecomputePolicy::Auto,
            ..PlannerConfig::default()
        };
        let backends = Backends::from_config(&config).unwrap();
        let planner = backends.planner(InMemoryMap::new(), LogNotifier);

        assert!(planner.markers().is_empty());
        assert!(planner.route().is_none());
        assert_eq!(planner.mode(), Mode::None);
        assert!(!planner.map().compute_enabled());
        assert!(!backends.autocomplete().is_visible());
    }
}
