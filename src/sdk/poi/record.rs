use crate::sdk::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type Tags = BTreeMap<String, String>;

/// OSM element type. Numeric ids are only unique within one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Node,
    Way,
    Relation,
}

/// Backend element id, stable across queries for the same feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoiId {
    #[serde(rename = "type", default)]
    pub kind: ElementKind,
    pub id: u64,
}

impl PoiId {
    pub fn new(kind: ElementKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn node(id: u64) -> Self {
        Self::new(ElementKind::Node, id)
    }

    pub fn way(id: u64) -> Self {
        Self::new(ElementKind::Way, id)
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "relation",
        };
        write!(f, "{}/{}", kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiRecord {
    pub id: PoiId,
    pub position: Coordinate,
    pub tags: Tags,
}

impl PoiRecord {
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.tags
            .get("name")
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "url", rename_all = "lowercase")]
pub enum ImageSlot {
    /// Not requested yet.
    Pending,
    Loading,
    Loaded(String),
    /// Every source was tried and none had an image.
    Empty,
}

impl ImageSlot {
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageSlot::Loaded(url) => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Tourism(String),
    Historic,
}

/// What the popup of a POI marker shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiDetail {
    pub name: String,
    pub badges: Vec<Badge>,
    pub description: Option<String>,
    pub tags: Tags,
    pub image: ImageSlot,
}

impl PoiDetail {
    pub fn for_record(record: &PoiRecord, fallback_name: &str) -> Self {
        let mut badges = Vec::new();
        if let Some(kind) = record.tags.get("tourism") {
            badges.push(Badge::Tourism(kind.clone()));
        }
        if record.tags.contains_key("historic") {
            badges.push(Badge::Historic);
        }
        Self {
            name: record.display_name(fallback_name).to_string(),
            badges,
            description: record.tags.get("description").cloned(),
            tags: record.tags.clone(),
            image: ImageSlot::Pending,
        }
    }
}
