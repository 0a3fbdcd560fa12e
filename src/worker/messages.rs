//! Worker thread message types for cross-thread communication.
//!
//! The main plugin thread hands dataset file reads to the background worker so
//! a large JSON document never stalls rendering. Each request carries the
//! caller's trace context so worker spans join the same trace.

use crate::domain::{Pharmacy, Result, YakgukError};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when passing messages to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Extracts the OpenTelemetry trace ID and span ID from the active span.
    /// Returns `None` if the current span context is invalid or not sampled.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use yakguk::worker::TraceContext;
    ///
    /// // No subscriber is installed here, so there is nothing to capture.
    /// assert!(TraceContext::from_current().is_none());
    /// ```
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let context = tracing::Span::current().context();
        let span = context.span();
        let span_context = span.span_context();
        if !span_context.is_valid() {
            return None;
        }

        let captured = Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        };
        tracing::trace!(trace_id = %captured.trace_id, "capturing trace context");
        Some(captured)
    }
}

/// Macro to generate builder methods for `WorkerMessage` variants.
///
/// Generates convenience constructors that automatically attach the current
/// trace context to each message variant.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_dataset(LoadDataset { path: String, request_id: u64 }),
}

/// Messages sent from the main thread to the worker thread.
///
/// All variants include an optional trace context for distributed tracing
/// support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read and parse the dataset file at `path`.
    LoadDataset {
        /// Sandbox path of the JSON dataset.
        path: String,

        /// Identifier echoed back so late answers can be discarded.
        request_id: u64,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadDataset { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Responses sent from the worker thread back to the main thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The dataset was parsed; every array entry that was an object is here.
    DatasetLoaded {
        request_id: u64,
        pharmacies: Vec<Pharmacy>,
    },

    /// The dataset could not be read or was not a JSON array.
    Error {
        request_id: u64,

        /// Human-readable error message.
        message: String,
    },
}

impl WorkerResponse {
    /// Decodes a response payload posted back by the worker.
    ///
    /// # Errors
    ///
    /// Returns [`YakgukError::Worker`] if the payload is not a response.
    pub fn from_payload(payload: &str) -> Result<Self> {
        serde_json::from_str(payload)
            .map_err(|e| YakgukError::Worker(format!("undecodable worker response: {e}")))
    }
}
