//! Tracing subscriber setup.

use super::tracer;
use crate::infrastructure::data_dir;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "yakguk";

/// Trace export file name inside the plugin data directory.
pub const TRACE_FILE: &str = "yakguk-otlp.json";

/// Installs the global subscriber: an `EnvFilter` built from `trace_level`
/// feeding an OpenTelemetry layer that exports to
/// `~/.local/share/zellij/yakguk/yakguk-otlp.json`.
///
/// Observability is best effort: if the data directory cannot be created the
/// plugin runs without a subscriber. Only the first call per thread group
/// installs anything; later calls are no-ops.
///
/// # Example
///
/// ```rust
/// use yakguk::observability::init_tracing;
/// use yakguk::Config;
///
/// let config = Config {
///     trace_level: "debug".to_string(),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// ```
pub fn init_tracing(config: &Config) {
    let dir = data_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", SERVICE_NAME),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(dir.join(TRACE_FILE), resource, SERVICE_NAME);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let filter = EnvFilter::try_new(&config.trace_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
