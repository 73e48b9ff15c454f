//! OTLP JSON encoding of finished spans.
//!
//! Each exported batch becomes one self-contained OTLP `resourceSpans`
//! document, so the trace file can be replayed line by line into any OTLP
//! collector.

use opentelemetry::trace::{Event, Link, SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Instrumentation scope name written into every document.
const SCOPE_NAME: &str = "Registrar";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Document<'a> {
    resource_spans: [ResourceSpans<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSpans<'a> {
    resource: Attributes,
    scope_spans: [ScopeSpans<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Attributes {
    attributes: Vec<Attribute>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScopeSpans<'a> {
    scope: Scope<'a>,
    spans: Vec<OtlpSpan>,
}

#[derive(Debug, Serialize)]
struct Scope<'a> {
    name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct Attribute {
    key: String,
    value: AnyValue,
}

/// OTLP `AnyValue`. Integers are strings, as the OTLP JSON mapping requires.
#[derive(Debug, Clone, PartialEq, Serialize)]
enum AnyValue {
    #[serde(rename = "boolValue")]
    Bool(bool),
    #[serde(rename = "intValue")]
    Int(String),
    #[serde(rename = "doubleValue")]
    Double(f64),
    #[serde(rename = "stringValue")]
    String(String),
}

impl From<&Value> for AnyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::I64(i) => Self::Int(i.to_string()),
            Value::F64(f) => Self::Double(*f),
            Value::String(s) => Self::String(s.to_string()),
            Value::Array(_) => Self::String(value.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpSpan {
    trace_id: String,
    span_id: String,
    parent_span_id: String,
    name: String,
    kind: u8,
    start_time_unix_nano: String,
    end_time_unix_nano: String,
    attributes: Vec<Attribute>,
    events: Vec<OtlpEvent>,
    links: Vec<OtlpLink>,
    status: OtlpStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpEvent {
    time_unix_nano: String,
    name: String,
    attributes: Vec<Attribute>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpLink {
    trace_id: String,
    span_id: String,
    attributes: Vec<Attribute>,
}

#[derive(Debug, Serialize)]
struct OtlpStatus {
    code: u8,
    message: String,
}

fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
        .to_string()
}

fn attributes(values: &[KeyValue]) -> Vec<Attribute> {
    values
        .iter()
        .map(|kv| Attribute {
            key: kv.key.to_string(),
            value: AnyValue::from(&kv.value),
        })
        .collect()
}

const fn kind_code(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

fn status(status: &Status) -> OtlpStatus {
    match status {
        Status::Unset => OtlpStatus { code: 0, message: String::new() },
        Status::Ok => OtlpStatus { code: 1, message: String::new() },
        Status::Error { description } => OtlpStatus {
            code: 2,
            message: description.to_string(),
        },
    }
}

fn event(event: &Event) -> OtlpEvent {
    OtlpEvent {
        time_unix_nano: unix_nanos(event.timestamp),
        name: event.name.to_string(),
        attributes: attributes(&event.attributes),
    }
}

fn link(link: &Link) -> OtlpLink {
    OtlpLink {
        trace_id: format!("{:032x}", link.span_context.trace_id()),
        span_id: format!("{:016x}", link.span_context.span_id()),
        attributes: attributes(&link.attributes),
    }
}

fn span(span: &SpanData) -> OtlpSpan {
    let parent_span_id = if span.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", span.parent_span_id)
    };

    OtlpSpan {
        trace_id: format!("{:032x}", span.span_context.trace_id()),
        span_id: format!("{:016x}", span.span_context.span_id()),
        parent_span_id,
        name: span.name.to_string(),
        kind: kind_code(&span.span_kind),
        start_time_unix_nano: unix_nanos(span.start_time),
        end_time_unix_nano: unix_nanos(span.end_time),
        attributes: attributes(&span.attributes),
        events: span.events.iter().map(event).collect(),
        links: span.links.iter().map(link).collect(),
        status: status(&span.status),
    }
}

/// Encodes span batches under a fixed resource.
pub struct SpanFormatter {
    resource: Vec<Attribute>,
}

impl SpanFormatter {
    pub fn new(resource: &Resource) -> Self {
        let resource = resource
            .iter()
            .map(|(key, value)| Attribute {
                key: key.to_string(),
                value: AnyValue::from(value),
            })
            .collect();
        Self { resource }
    }

    /// Encodes `batch` as a single-line OTLP JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format_batch(&self, batch: &[SpanData]) -> serde_json::Result<String> {
        let document = Document {
            resource_spans: [ResourceSpans {
                resource: Attributes {
                    attributes: self.resource.clone(),
                },
                scope_spans: [ScopeSpans {
                    scope: Scope { name: SCOPE_NAME },
                    spans: batch.iter().map(span).collect(),
                }],
            }],
        };
        serde_json::to_string(&document)
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter")
            .field("resource_attributes", &self.resource.len())
            .finish()
    }
}
