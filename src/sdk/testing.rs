//! Scripted in-process backends for unit tests.

use crate::sdk::geo::Coordinate;
use crate::sdk::map::{Notification, Notifier};
use crate::sdk::poi::error::{ImageError, PoiError};
use crate::sdk::poi::image::EncyclopediaProvider;
use crate::sdk::poi::provider::{PoiElement, PoiProvider};
use crate::sdk::poi::record::{PoiId, Tags};
use crate::sdk::routing::{RouteResult, RoutingError, RoutingProvider};
use crate::sdk::search::error::SearchError;
use crate::sdk::search::provider::GeocodingProvider;
use crate::sdk::search::SearchSuggestion;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

pub fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

pub fn route(points: &[(f64, f64)], distance_meters: f64) -> RouteResult {
    RouteResult {
        geometry: points.iter().map(|&(lat, lon)| coord(lat, lon)).collect(),
        distance_meters,
    }
}

pub fn element(id: u64, lat: f64, lon: f64, tags: &[(&str, &str)]) -> PoiElement {
    PoiElement {
        id: PoiId::node(id),
        lat: Some(lat),
        lon: Some(lon),
        center: None,
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Tags>(),
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<&Notification> {
        self.messages.last()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.messages.push(notification);
    }
}

/// Answers each route request with the next scripted outcome.
#[derive(Default)]
pub struct FakeRouter {
    outcomes: Mutex<VecDeque<Result<RouteResult, RoutingError>>>,
    requests: Mutex<Vec<Vec<Coordinate>>>,
}

impl FakeRouter {
    pub fn new(outcomes: Vec<Result<RouteResult, RoutingError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Coordinate>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutingProvider for FakeRouter {
    async fn route(&self, points: &[Coordinate]) -> Result<RouteResult, RoutingError> {
        self.requests.lock().unwrap().push(points.to_vec());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RoutingError::RouteNotFound))
    }
}

#[derive(Default)]
pub struct FakePois {
    outcomes: Mutex<VecDeque<Result<Vec<PoiElement>, PoiError>>>,
    requests: Mutex<Vec<Vec<Coordinate>>>,
}

impl FakePois {
    pub fn new(outcomes: Vec<Result<Vec<PoiElement>, PoiError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Coordinate>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PoiProvider for FakePois {
    async fn query(&self, samples: &[Coordinate]) -> Result<Vec<PoiElement>, PoiError> {
        self.requests.lock().unwrap().push(samples.to_vec());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }
}

pub struct FakeEncyclopedia {
    thumbnail: Option<String>,
    fail: bool,
    titles: Mutex<Vec<String>>,
}

impl FakeEncyclopedia {
    pub fn with_thumbnail(url: &str) -> Self {
        Self {
            thumbnail: Some(url.to_string()),
            fail: false,
            titles: Mutex::default(),
        }
    }

    pub fn empty() -> Self {
        Self {
            thumbnail: None,
            fail: false,
            titles: Mutex::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            thumbnail: None,
            fail: true,
            titles: Mutex::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.titles.lock().unwrap().len()
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncyclopediaProvider for FakeEncyclopedia {
    async fn thumbnail(&self, title: &str) -> Result<Option<String>, ImageError> {
        self.titles.lock().unwrap().push(title.to_string());
        if self.fail {
            return Err(ImageError::Status(503));
        }
        Ok(self.thumbnail.clone())
    }
}

/// Geocoder whose answers take a per-query delay on the tokio clock.
#[derive(Default)]
pub struct FakeGeocoder {
    answers: HashMap<String, (Duration, Vec<SearchSuggestion>)>,
    queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn answer(mut self, query: &str, delay_ms: u64, names: &[&str]) -> Self {
        let suggestions = names
            .iter()
            .enumerate()
            .map(|(i, name)| SearchSuggestion {
                display_name: name.to_string(),
                position: coord(35.0 + i as f64 * 0.01, 139.0),
            })
            .collect();
        self.answers.insert(
            query.to_string(),
            (Duration::from_millis(delay_ms), suggestions),
        );
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeocodingProvider for FakeGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<SearchSuggestion>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        match self.answers.get(query) {
            Some((delay, suggestions)) => {
                tokio::time::sleep(*delay).await;
                Ok(suggestions.clone())
            }
            None => Err(SearchError::ApiError {
                status: 500,
                body: "unscripted".into(),
            }),
        }
    }
}
