pub mod backends;
pub mod config;
pub mod geo;
pub mod map;
pub mod markers;
pub mod mode;
pub mod planner;
pub mod poi;
pub mod routing;
pub mod search;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;
