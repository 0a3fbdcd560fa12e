//! Worker thread implementation for dataset loading.
//!
//! Zellij runs the worker on its own thread. Reading and parsing a dataset of
//! several thousand records happens here so the plugin keeps rendering the
//! loading overlay meanwhile.

use crate::domain::error::Result;
use crate::domain::Pharmacy;
use crate::storage::{JsonDataset, PharmacySource};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// Worker thread state.
#[derive(Serialize, Deserialize, Default)]
pub struct YakgukWorker {
    /// Number of load requests served, for log correlation.
    #[serde(skip)]
    loads_served: u64,
}

impl YakgukWorker {
    /// Loads a dataset from any source and wraps the outcome for the plugin.
    pub fn load_from(&mut self, source: &dyn PharmacySource, request_id: u64) -> WorkerResponse {
        self.loads_served += 1;
        tracing::debug!(
            source = %source.describe(),
            request_id = request_id,
            loads_served = self.loads_served,
            "loading dataset"
        );

        Self::handle_load_result(request_id, source.load())
    }

    /// Converts a load result into a response with consistent logging.
    fn handle_load_result(request_id: u64, result: Result<Vec<Pharmacy>>) -> WorkerResponse {
        match result {
            Ok(pharmacies) => {
                tracing::debug!(count = pharmacies.len(), "dataset parsed");
                WorkerResponse::DatasetLoaded {
                    request_id,
                    pharmacies,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "dataset load failed");
                WorkerResponse::Error {
                    request_id,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response to post back.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadDataset { path, request_id, .. } => {
                let source = JsonDataset::new(PathBuf::from(path));
                self.load_from(&source, request_id)
            }
        }
    }
}

/// Initializes tracing for the worker thread.
///
/// Workers never receive the plugin configuration, so the defaults are used;
/// both threads append to the same log file.
fn init_worker_tracing() {
    use crate::observability;
    use crate::Config;

    let config = Config::default();
    observability::init_tracing(&config);
}

static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for YakgukWorker {
    /// Handles incoming messages from the main plugin thread.
    ///
    /// `message` is the routing name echoed back with the response; `payload`
    /// is a JSON-serialized [`WorkerMessage`].
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            init_worker_tracing();
        }

        let worker_message: WorkerMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.handle_message(worker_message);

        match serde_json::to_string(&response) {
            Ok(payload) => {
                post_message_to_plugin(PluginMessage {
                    name: message,
                    payload,
                    worker_name: None,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker response");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn message_for(path: &str, request_id: u64) -> WorkerMessage {
        WorkerMessage::LoadDataset {
            path: path.to_string(),
            request_id,
            trace_context: None,
        }
    }

    #[test]
    fn loads_dataset_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[{"pharmacy_name_en":"Sun Pharmacy","pharmacy_name_kr":"","address_en":"","address_kr":"","coordinates":{"x":"127.0","y":"37.5"}}]"#,
        )
        .unwrap();

        let mut worker = YakgukWorker::default();
        let response = worker.handle_message(message_for(&file.path().to_string_lossy(), 4));

        let WorkerResponse::DatasetLoaded { request_id, pharmacies } = response else {
            panic!("expected a loaded dataset, got {response:?}");
        };
        assert_eq!(request_id, 4);
        assert_eq!(pharmacies.len(), 1);
        assert_eq!(pharmacies[0].name_en, "Sun Pharmacy");
    }

    #[test]
    fn missing_file_reports_error_with_request_id() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");

        let mut worker = YakgukWorker::default();
        let response = worker.handle_message(message_for(&missing.to_string_lossy(), 9));

        assert!(matches!(response, WorkerResponse::Error { request_id: 9, .. }));
    }

    #[test]
    fn non_array_document_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"pharmacies": []}"#).unwrap();

        let mut worker = YakgukWorker::default();
        let response = worker.handle_message(message_for(&file.path().to_string_lossy(), 1));

        let WorkerResponse::Error { message, .. } = response else {
            panic!("expected an error");
        };
        assert!(message.starts_with("Dataset error"));
    }
}
