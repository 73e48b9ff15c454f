//! OpenTelemetry tracer provider that exports spans to a local file.
//!
//! Zellij plugins run sandboxed without network access, so spans are written
//! as OTLP JSON lines into the plugin data directory instead of being sent to
//! a collector.

use super::file_writer::RotatingFile;
use super::span_formatter::SpanFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Writes every exported batch as one OTLP JSON line.
#[derive(Debug)]
struct FileSpanExporter {
    file: RotatingFile,
    formatter: SpanFormatter,
    shut_down: bool,
}

impl FileSpanExporter {
    fn export_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.shut_down {
            return Err(TraceError::from("file exporter is shut down"));
        }
        let line = self
            .formatter
            .format_batch(batch)
            .map_err(|e| TraceError::from(e.to_string()))?;
        self.file
            .write_line(&line)
            .map_err(|e| TraceError::from(e.to_string()))
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = self.export_batch(&batch);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }
}

/// Builds a provider exporting each span synchronously to `file_path`.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter {
        file: RotatingFile::new(file_path),
        formatter: SpanFormatter::new(&resource),
        shut_down: false,
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
