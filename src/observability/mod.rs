//! OpenTelemetry tracing with file-based export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OpenTelemetry SDK → OtlpFileExporter → JSON lines
//! ```
//!
//! - Spans land in `~/.local/share/zellij/yakguk/yakguk-otlp.json` as OTLP/JSON,
//!   one document per exported batch.
//! - The file rotates at 10 MB, keeping three numbered backups.
//! - The level comes from the `trace_level` plugin option (default `info`).
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`tracer`]: tracer provider and span exporter
//! - [`span_formatter`]: OTLP/JSON encoding
//! - [`file_writer`]: rotating file

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TRACE_FILE};
