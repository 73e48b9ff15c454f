//! Tracing with file-based OpenTelemetry export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK TracerProvider → FileSpanExporter → RotatingFile
//! ```
//!
//! Spans land in `~/.local/share/zellij/registrar/registrar-otlp.json`, one
//! OTLP JSON document per line, rotated at 10 MB with three numbered backups.
//! The level comes from the `trace_level` plugin option (default `info`).

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
