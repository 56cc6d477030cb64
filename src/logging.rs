//! Logging System
//!
//! Structured logging via the `tracing` crate: configurable level
//! filter, text or JSON output, stderr or file destination.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;
use crate::error::CoreError;

/// Install the global subscriber from the logging configuration.
///
/// Fails if a subscriber is already installed; call once from the
/// binary entry point.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CoreError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| CoreError::Config(format!("invalid log level '{}': {}", config.level, e)))?;

    let writer = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let layer = fmt::layer()
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);

    let result = match config.format.as_str() {
        "json" => Registry::default()
            .with(filter)
            .with(layer.json())
            .try_init(),
        "text" => Registry::default().with(filter).with(layer).try_init(),
        other => {
            return Err(CoreError::Config(format!("unknown log format '{other}'")));
        }
    };

    result.map_err(|e| CoreError::Config(format!("failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_format() {
        let config = LoggingConfig {
            format: "yaml".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            init_logging(&config),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn rejects_invalid_filter_directive() {
        let config = LoggingConfig {
            level: "not=a=level".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            init_logging(&config),
            Err(CoreError::Config(_))
        ));
    }
}
