//! Subscriber setup.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber.
///
/// Logs go to stderr, filtered by `RUST_LOG`, else `config.trace_level`,
/// else `"info"`. With `config.trace_file` set, spans are also exported as
/// OTLP JSON to `<data_dir>/cancapp-otlp.json`; the exporter is skipped if
/// the data directory cannot be created.
///
/// Safe to call more than once: only the first call installs anything.
///
/// # Example
///
/// ```rust
/// use cancapp::observability::init_tracing;
/// use cancapp::Config;
///
/// init_tracing(&Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// });
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let otel_layer = if config.trace_file && std::fs::create_dir_all(&config.data_dir).is_ok() {
        let resource = Resource::new(vec![
            KeyValue::new("service.name", "cancapp"),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);
        let provider = exporter::tracer_provider(config.trace_file_path(), resource);
        Some(OpenTelemetryLayer::new(provider.tracer(exporter::SCOPE)))
    } else {
        None
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
