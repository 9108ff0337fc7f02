use crate::sdk::routing::DEFAULT_SAMPLE_STRIDE;
use std::env;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_WIKIPEDIA_URL: &str = "https://ja.wikipedia.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = "osanpo-plus";
pub const DEFAULT_OSRM_PER_MINUTE: u32 = 60;
pub const DEFAULT_OVERPASS_PER_MINUTE: u32 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got \"{value}\"")]
    InvalidUrl { var: &'static str, value: String },

    #[error("{var} must be a positive integer, got \"{value}\"")]
    InvalidNumber { var: &'static str, value: String },

    #[error("Unknown recompute policy \"{0}\" (expected \"manual\" or \"auto\")")]
    InvalidPolicy(String),
}

/// Whether placing or removing a marker recomputes the route by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecomputePolicy {
    /// Only the "compute" control is toggled; the user triggers the route.
    #[default]
    Manual,
    /// Every change that leaves start and goal set recomputes the route.
    Auto,
}

impl FromStr for RecomputePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(RecomputePolicy::Manual),
            "auto" => Ok(RecomputePolicy::Auto),
            other => Err(ConfigError::InvalidPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub osrm_url: String,
    pub overpass_url: String,
    pub nominatim_url: String,
    pub wikipedia_url: String,
    pub user_agent: String,
    pub sample_stride: NonZeroUsize,
    pub poi_radius_m: u32,
    pub debounce: Duration,
    pub recompute: RecomputePolicy,
    pub poi_label: String,
    pub osrm_per_minute: u32,
    pub overpass_per_minute: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            wikipedia_url: DEFAULT_WIKIPEDIA_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            poi_radius_m: crate::sdk::poi::provider::DEFAULT_RADIUS_M,
            debounce: crate::sdk::search::autocomplete::DEFAULT_DEBOUNCE,
            recompute: RecomputePolicy::default(),
            poi_label: crate::sdk::poi::pipeline::DEFAULT_POI_LABEL.to_string(),
            osrm_per_minute: DEFAULT_OSRM_PER_MINUTE,
            overpass_per_minute: DEFAULT_OVERPASS_PER_MINUTE,
        }
    }
}

impl PlannerConfig {
    /// Reads `OSANPO_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let url = |var: &'static str, default: String| -> Result<String, ConfigError> {
            match lookup(var) {
                Some(value) if value.starts_with("http://") || value.starts_with("https://") => {
                    Ok(value)
                }
                Some(value) => Err(ConfigError::InvalidUrl { var, value }),
                None => Ok(default),
            }
        };
        config.osrm_url = url("OSANPO_OSRM_URL", config.osrm_url)?;
        config.overpass_url = url("OSANPO_OVERPASS_URL", config.overpass_url)?;
        config.nominatim_url = url("OSANPO_NOMINATIM_URL", config.nominatim_url)?;
        config.wikipedia_url = url("OSANPO_WIKIPEDIA_URL", config.wikipedia_url)?;

        if let Some(agent) = lookup("OSANPO_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(value) = lookup("OSANPO_SAMPLE_STRIDE") {
            config.sample_stride = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OSANPO_SAMPLE_STRIDE",
                    value,
                })?;
        }
        let positive = |var: &'static str, default: u32| -> Result<u32, ConfigError> {
            let Some(value) = lookup(var) else {
                return Ok(default);
            };
            value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidNumber { var, value })
        };
        config.poi_radius_m = positive("OSANPO_POI_RADIUS_M", config.poi_radius_m)?;
        config.osrm_per_minute = positive("OSANPO_OSRM_PER_MINUTE", config.osrm_per_minute)?;
        config.overpass_per_minute =
            positive("OSANPO_OVERPASS_PER_MINUTE", config.overpass_per_minute)?;
        if let Some(value) = lookup("OSANPO_DEBOUNCE_MS") {
            let ms: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                var: "OSANPO_DEBOUNCE_MS",
                value: value.clone(),
            })?;
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(value) = lookup("OSANPO_RECOMPUTE") {
            config.recompute = value.parse()?;
        }
        if let Some(label) = lookup("OSANPO_POI_LABEL") {
            config.poi_label = label;
        }
        Ok(config)
    }
}
