use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging on stderr.
///
/// `RUST_LOG` wins over the configured level. Calling this twice is harmless;
/// the second subscriber is simply not installed.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if installed.is_ok() {
        tracing::debug!(json = config.json_logs, "Telemetry initialized");
    }
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one device transition
pub fn create_transition_span(
    operation: &str,
    device_id: &str,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "device_transition",
        operation = operation,
        device.id = device_id,
        correlation.id = correlation_id,
    )
}
