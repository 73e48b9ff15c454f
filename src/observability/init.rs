//! Subscriber setup: `tracing` macros → OpenTelemetry → trace file.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service and tracer name attached to every span.
const SERVICE_NAME: &str = "Registrar";

/// File name of the span export inside the plugin data directory.
const TRACE_FILE: &str = "registrar-otlp.json";

/// Installs the global subscriber, filtering by `config.trace_level`.
///
/// An unparsable level falls back to `info`. Does nothing if the data
/// directory cannot be created, and only the first call in a process has an
/// effect, so the plugin and worker threads may both call it.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.trace_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();

    tracing::debug!(level = %config.trace_level, "tracing initialized");
}
