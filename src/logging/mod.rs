// Logging module for structured logging using the tracing crate

use std::error::Error;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize the tracing subscriber for structured logging
///
/// The subscriber is configured with:
/// - JSON formatting for easy parsing by log aggregation systems
/// - Filtering from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`]
/// - Output to stdout for container/cloud-native deployments
///
/// Calling it again after a global subscriber is installed is a no-op.
///
/// # Errors
///
/// Returns an error if `RUST_LOG` is set but cannot be parsed.
///
/// # Examples
///
/// ```
/// use shrinkray::logging::init_subscriber;
///
/// init_subscriber().expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber() -> Result<(), Box<dyn Error>> {
    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())?;

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true),
        )
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }

    Ok(())
}

/// Build the level filter from an optional directive string
pub fn build_filter(directives: Option<&str>) -> Result<EnvFilter, Box<dyn Error>> {
    match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => Ok(EnvFilter::try_new(directives)?),
        None => Ok(EnvFilter::new(DEFAULT_LOG_FILTER)),
    }
}
