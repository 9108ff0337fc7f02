use env_logger::{Builder, Env};

/// `OSANPO_LOG` wins over `RUST_LOG`.
pub const LOG_ENV: &str = "OSANPO_LOG";
const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn,rustls=warn";

pub fn init_logging() {
    let env = Env::default()
        .filter_or(LOG_ENV, default_filter())
        .write_style("OSANPO_LOG_STYLE");
    // A second call (tests, embedding) keeps the first logger.
    let _ = Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();
}

fn default_filter() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string())
}
