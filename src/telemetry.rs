use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global JSON subscriber; `RUST_LOG` overrides the level.
/// Call once, at the very start of `main`.
pub fn init_telemetry() {
    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .json();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(formatting_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        // the global subscriber can only be set once per process, so only
        // the filter construction is exercised here
        let filter = EnvFilter::new(DEFAULT_LOG_FILTER);
        assert!(filter.to_string().contains(DEFAULT_LOG_FILTER));
    }
}
