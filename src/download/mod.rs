//! Streaming download engine for hub model files.
//!
//! The nodes hand the manager a resolved URL and save path; the manager
//! handles skip-or-overwrite, retries transient failures, and streams the
//! body to disk while feeding progress updates back to the host.

mod client;
pub mod constants;
mod error;
mod manager;
mod retry;

pub use client::HttpClient;
pub use error::DownloadError;
pub use manager::{DownloadManager, DownloadOutcome, DownloadRequest};
pub use retry::{DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error};
