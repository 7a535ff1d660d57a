//! Tracing subscriber setup.
//!
//! Wires `tracing` macros either to a compact stderr formatter or, when a
//! trace file is configured, through OpenTelemetry to the JSON-lines exporter
//! in [`super::exporter`].

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::exporter::{file_tracer_provider, SCOPE};
use crate::infrastructure::expand_tilde;
use crate::Config;

/// Filter used when no level is configured.
pub const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber.
///
/// # Pipeline
///
/// Without `trace_file`, events are formatted compactly to stderr. With it,
/// spans pass through an OpenTelemetry layer and are appended as JSON lines
/// to that file. The resource carries `service.name` (the app title) and
/// `service.version`.
///
/// # Level Resolution
///
/// 1. `RUST_LOG`, when set and parseable
/// 2. `config.trace_level`
/// 3. [`DEFAULT_LEVEL`]
///
/// # File Location
///
/// `trace_file` may start with `~/`, which is expanded against `$HOME`.
/// Missing parent directories are created.
///
/// # Returns
///
/// `false` when a global subscriber was already installed or the trace
/// directory cannot be created. Neither is fatal: the app runs untraced.
/// Only the first successful call takes effect.
///
/// # Example
///
/// ```rust
/// use redbank::observability::init_tracing;
/// use redbank::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> bool {
    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(trace_file) = config.trace_file.as_deref().map(expand_tilde) else {
        return tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).compact())
            .try_init()
            .is_ok();
    };

    if let Some(parent) = trace_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        if std::fs::create_dir_all(parent).is_err() {
            return false;
        }
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", config.app_title.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = file_tracer_provider(trace_file, resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SCOPE));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_ok()
}
