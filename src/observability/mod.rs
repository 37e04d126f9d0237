//! OpenTelemetry tracing with file-based export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK TracerProvider → FileSpanExporter → OTLP JSON lines
//! ```
//!
//! Spans land in `countryscope-otlp.json` inside the data directory, one OTLP
//! JSON document per exported batch. The file rotates at 10 MB and keeps three
//! backups. The filter comes from the `trace_level` option (default `info`).
//!
//! # Modules
//!
//! - [`exporter`]: span exporter and OTLP JSON encoding
//! - [`rotating`]: size-rotated append-only file

pub mod exporter;
pub mod rotating;

use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name reported as `service.name` and as the instrumentation scope.
pub const SERVICE_NAME: &str = "countryscope";

const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber.
///
/// Observability is optional: if the data directory cannot be created, or a
/// subscriber is already installed, this returns without doing anything.
/// An unparsable `trace_level` falls back to `info`.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let trace_file = crate::infrastructure::trace_file();
    if let Some(dir) = trace_file.parent() {
        if std::fs::create_dir_all(dir).is_err() {
            return;
        }
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);
    let provider = exporter::create_tracer_provider(trace_file, resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
