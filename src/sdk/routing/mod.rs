pub mod error;
pub mod provider;
pub mod route;
pub mod sampler;
pub mod service;

pub use error::RoutingError;
pub use provider::OsrmProvider;
pub use route::RouteResult;
pub use sampler::{sample, DEFAULT_SAMPLE_STRIDE};
pub use service::RoutingProvider;
