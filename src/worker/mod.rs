//! Background worker thread for dataset loading.
//!
//! Zellij's worker API keeps file I/O off the rendering thread. Requests and
//! responses are JSON payloads carried by plugin messages, with trace context
//! propagated so worker spans appear under the plugin span that caused them.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::YakgukWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
