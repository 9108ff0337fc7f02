pub mod error;
pub mod image;
pub mod pipeline;
pub mod provider;
pub mod record;

pub use error::{ImageError, PoiError};
pub use image::{EncyclopediaProvider, ImageResolver, WikipediaProvider};
pub use pipeline::{ImageRequest, PoiPipeline};
pub use provider::{OverpassProvider, PoiElement, PoiProvider};
pub use record::{ElementKind, ImageSlot, PoiDetail, PoiId, PoiRecord};
