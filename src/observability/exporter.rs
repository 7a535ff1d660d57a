//! OpenTelemetry span exporter writing OTLP-style JSON lines.
//!
//! Each exported batch becomes one line:
//!
//! ```json
//! {"resourceSpans":[{"resource":{"attributes":[...]},
//!   "scopeSpans":[{"scope":{"name":"redbank"},"spans":[...]}]}]}
//! ```

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Value as Json};

use super::file_writer::{RotatingFile, DEFAULT_BACKUPS, DEFAULT_MAX_BYTES};

/// Instrumentation scope recorded on every batch.
pub const SCOPE: &str = "redbank";

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos()
        .to_string()
}

fn value_json(value: &Value) -> Json {
    match value {
        Value::Bool(b) => json!({ "boolValue": b }),
        Value::I64(i) => json!({ "intValue": i.to_string() }),
        Value::F64(f) => json!({ "doubleValue": f }),
        Value::String(s) => json!({ "stringValue": s.as_str() }),
        _ => json!({ "stringValue": value.to_string() }),
    }
}

fn attributes_json<'a>(attributes: impl IntoIterator<Item = &'a KeyValue>) -> Vec<Json> {
    attributes
        .into_iter()
        .map(|kv| json!({ "key": kv.key.as_str(), "value": value_json(&kv.value) }))
        .collect()
}

fn span_json(span: &SpanData) -> Json {
    let (code, message) = match &span.status {
        Status::Unset => (0, String::new()),
        Status::Ok => (1, String::new()),
        Status::Error { description } => (2, description.to_string()),
    };
    let parent = if span.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", span.parent_span_id)
    };
    let events: Vec<Json> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "timeUnixNano": unix_nanos(event.timestamp),
                "name": event.name,
                "attributes": attributes_json(&event.attributes),
            })
        })
        .collect();

    json!({
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": parent,
        "name": span.name,
        "startTimeUnixNano": unix_nanos(span.start_time),
        "endTimeUnixNano": unix_nanos(span.end_time),
        "attributes": attributes_json(&span.attributes),
        "events": events,
        "status": { "code": code, "message": message },
    })
}

/// Writes every exported batch to a [`RotatingFile`].
#[derive(Debug)]
struct JsonLinesExporter {
    writer: RotatingFile,
    resource: Resource,
    shut_down: bool,
}

impl JsonLinesExporter {
    fn batch_json(&self, batch: &[SpanData]) -> Json {
        let resource: Vec<Json> = self
            .resource
            .iter()
            .map(|(key, value)| json!({ "key": key.as_str(), "value": value_json(value) }))
            .collect();
        let spans: Vec<Json> = batch.iter().map(span_json).collect();
        json!({
            "resourceSpans": [{
                "resource": { "attributes": resource },
                "scopeSpans": [{ "scope": { "name": SCOPE }, "spans": spans }],
            }]
        })
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.shut_down {
            Err(TraceError::from("exporter is shut down"))
        } else {
            self.writer
                .write_line(&self.batch_json(&batch).to_string())
                .map_err(|e| TraceError::from(e.to_string()))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

/// Tracer provider exporting each finished span to `path` as it ends.
#[must_use]
pub fn file_tracer_provider(path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter {
        writer: RotatingFile::new(path, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS),
        resource: resource.clone(),
        shut_down: false,
    };
    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
