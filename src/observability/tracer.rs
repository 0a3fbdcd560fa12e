//! OpenTelemetry tracer provider exporting to a local file.
//!
//! The plugin runs inside the Zellij WASM sandbox with no network exporter
//! available, so finished spans are encoded as OTLP/JSON and appended to a
//! rotating file under the plugin data directory.

use super::file_writer::RotatingFile;
use super::span_formatter::SpanFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::future::ready;
use std::path::PathBuf;

/// Span exporter writing one OTLP/JSON document per batch.
#[derive(Debug)]
struct OtlpFileExporter {
    file: RotatingFile,
    formatter: SpanFormatter,
    stopped: bool,
}

impl SpanExporter for OtlpFileExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.stopped {
            return Box::pin(ready(Err(TraceError::from("exporter is shut down"))));
        }

        let line = self.formatter.format_batch(&batch).to_string();
        let result = self
            .file
            .write_line(&line)
            .map_err(|e| TraceError::from(e.to_string()));
        Box::pin(ready(result))
    }

    fn shutdown(&mut self) {
        self.stopped = true;
    }
}

/// Builds a tracer provider that exports every finished span immediately.
///
/// A simple (non-batching) processor is used because the sandbox has no
/// background runtime to drive a batch exporter.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource, scope: &'static str) -> TracerProvider {
    let exporter = OtlpFileExporter {
        file: RotatingFile::new(file_path),
        formatter: SpanFormatter::new(resource.clone(), scope),
        stopped: false,
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
