pub mod sdk;

pub use sdk::backends::Backends;
pub use sdk::config::{PlannerConfig, RecomputePolicy};
pub use sdk::geo::{Bounds, Coordinate};
pub use sdk::map::{InMemoryMap, LogNotifier, MapSurface, Notification, Notifier};
pub use sdk::markers::{MarkerStore, Role};
pub use sdk::mode::{Mode, ModeController};
pub use sdk::planner::{Planner, RouteOutcome};
pub use sdk::poi::PoiPipeline;
pub use sdk::routing::{sample, RouteResult, RoutingError};
pub use sdk::search::{SearchAutocomplete, SearchSuggestion};
