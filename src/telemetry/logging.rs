use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::TelemetryConfig;
use crate::error::Error;

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), Error> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.structured_logging {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(true),
            )
            .try_init()
    };

    result.map_err(|e| Error::Internal(format!("Failed to set global default subscriber: {}", e)))
}

/// Build the level filter from `RUST_LOG` or the configured level
fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, Error> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(config.log_level.to_lowercase())
        .map_err(|e| Error::Config(format!("Invalid log level {}: {}", config.log_level, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_known_levels() {
        for level in ["trace", "debug", "INFO", "warn", "error"] {
            let config = TelemetryConfig {
                log_level: level.to_string(),
                structured_logging: false,
            };
            assert!(build_filter(&config).is_ok(), "level {} rejected", level);
        }
    }
}
