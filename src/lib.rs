//! Hub download nodes for a node-graph media pipeline host.
//!
//! This crate is a plugin node pack: the host discovers the exported node
//! classes through [`build_default_node_registry`], renders their declared
//! input schemas, and calls each node's entry point when the graph runs.
//! Two nodes are exported: a plain hub download and a token-authenticated
//! variant for gated or private repositories.
//!
//! # Architecture
//!
//! - [`node`] - host node contract, input schemas, the two download nodes
//! - [`download`] - streaming download engine with retry and progress
//! - [`hub`] - repository id validation and resolve-URL construction
//! - [`auth`] - process-wide hub token state
//! - [`paths`] - model directory enumeration and save-path resolution
//! - [`progress`] - progress payloads routed back to the host UI
//! - [`config`] - models root, hub endpoint, timeouts

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod download;
pub mod hub;
pub mod node;
pub mod paths;
pub mod progress;
#[cfg(test)]
mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use auth::{AuthError, HubToken, current_token, login, logout};
pub use config::Config;
pub use download::{
    DEFAULT_MAX_RETRIES, DownloadError, DownloadManager, DownloadOutcome, DownloadRequest,
    FailureType, HttpClient, RetryDecision, RetryPolicy, classify_error,
};
pub use hub::{DEFAULT_HUB_ENDPOINT, HubError, resolve_file_url, validate_repo_id};
pub use node::{
    HfAuthDownloader, HfDownloader, HostContext, InputKind, InputSchema, InputSpec, Node,
    NodeError, NodeInputs, NodeOutputs, NodeRegistry, OutputSpec, Value,
    build_default_node_registry,
};
pub use paths::{DEFAULT_MODEL_DIRS, PathError, model_dirs, prepare_download_path};
pub use progress::{LogReporter, ProgressReporter, ProgressScope, ProgressUpdate};
