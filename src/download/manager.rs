//! The download manager the nodes delegate to.
//!
//! One call per node execution: skip-or-overwrite handling, the retry loop
//! around the streaming client, and the final outcome reported back to the
//! node.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::client::HttpClient;
use super::error::DownloadError;
use super::retry::{RetryDecision, RetryPolicy, classify_error};
use crate::config::Config;
use crate::progress::ProgressScope;

/// A single download order from a node.
#[derive(Debug)]
pub struct DownloadRequest<'a> {
    /// Fully resolved remote URL.
    pub url: &'a str,
    /// Fully resolved local destination.
    pub save_path: &'a Path,
    /// Whether an existing destination file may be replaced.
    pub overwrite: bool,
    /// Progress routing for the host UI, when the host wants updates.
    pub progress: Option<ProgressScope<'a>>,
}

/// What a download call produced.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// The destination file.
    pub path: PathBuf,
    /// Size of the destination after the call.
    pub bytes_downloaded: u64,
    /// Content-Length the server announced, when the file was fetched.
    pub content_length: Option<u64>,
    /// True when an existing file was kept and no request was made.
    pub skipped_existing: bool,
}

/// Download engine shared by every node execution.
#[derive(Debug, Clone)]
pub struct DownloadManager {
    client: HttpClient,
    retry_policy: RetryPolicy,
}

impl DownloadManager {
    /// Creates a manager with the config's timeouts and the default retry
    /// policy.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            client: HttpClient::new_with_timeouts(
                config.connect_timeout().as_secs(),
                config.read_timeout().as_secs(),
            ),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Downloads one file, reporting progress through the request's scope.
    ///
    /// With `overwrite` false and an existing destination, the file is kept
    /// and no request is made. Transient failures are retried under the
    /// manager's [`RetryPolicy`]; the last error is returned once retries
    /// are exhausted.
    ///
    /// # Errors
    ///
    /// Returns the final [`DownloadError`] when every attempt failed.
    #[instrument(skip(self, request), fields(url = %request.url, path = %request.save_path.display()))]
    pub async fn download_with_progress(
        &self,
        request: DownloadRequest<'_>,
    ) -> Result<DownloadOutcome, DownloadError> {
        if !request.overwrite {
            if let Ok(meta) = tokio::fs::metadata(request.save_path).await {
                info!(
                    path = %request.save_path.display(),
                    bytes = meta.len(),
                    "destination exists and overwrite is off, keeping file"
                );
                if let Some(scope) = &request.progress {
                    scope.emit(meta.len(), Some(meta.len()));
                }
                return Ok(DownloadOutcome {
                    path: request.save_path.to_path_buf(),
                    bytes_downloaded: meta.len(),
                    content_length: None,
                    skipped_existing: true,
                });
            }
        }

        let mut attempt: u32 = 1;
        loop {
            match self
                .client
                .download_to_path(request.url, request.save_path, request.progress.as_ref())
                .await
            {
                Ok(outcome) => {
                    info!(
                        path = %request.save_path.display(),
                        bytes = outcome.bytes_written,
                        attempt,
                        "download complete"
                    );
                    return Ok(DownloadOutcome {
                        path: request.save_path.to_path_buf(),
                        bytes_downloaded: outcome.bytes_written,
                        content_length: outcome.content_length,
                        skipped_existing: false,
                    });
                }
                Err(e) => {
                    let failure_type = classify_error(&e);
                    match self.retry_policy.should_retry(failure_type, attempt) {
                        RetryDecision::Retry {
                            delay,
                            attempt: next_attempt,
                        } => {
                            info!(
                                url = %request.url,
                                attempt = next_attempt,
                                max_attempts = self.retry_policy.max_attempts(),
                                delay_ms = delay.as_millis(),
                                error = %e,
                                "retrying download"
                            );
                            tokio::time::sleep(delay).await;
                            attempt = next_attempt;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            debug!(url = %request.url, %reason, "not retrying download");
                            return Err(e);
                        }
                    }
                }
            }
        }
    }
}
