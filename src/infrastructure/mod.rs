//! Infrastructure layer for filesystem and environment interactions.
//!
//! Utilities for the Zellij plugin sandbox, where the host filesystem is
//! mounted under `/host`.

pub mod paths;

pub use paths::{data_dir, expand_tilde, resolve_host_path, strip_host_prefix, HOST_ROOT};
