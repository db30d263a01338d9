//! HTTP client wrapper for streaming hub files to disk.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, PROGRESS_INTERVAL, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::auth;
use crate::progress::{ProgressScope, ProgressThrottle};
use crate::user_agent;

/// HTTP client for hub downloads.
///
/// Created once per execution context and reused across node executions so
/// connection pooling applies. If a process-wide hub token is stored (see
/// [`crate::auth::login`]), every request carries it as a bearer credential.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// What a completed stream wrote.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StreamOutcome {
    /// Bytes written to disk.
    pub(crate) bytes_written: u64,
    /// Content-Length the server announced, when present.
    pub(crate) content_length: Option<u64>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with the default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration, which should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .timeout(std::time::Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Downloads `url` to `path`, streaming chunks through `progress`.
    ///
    /// The destination is created (or truncated) up front; a partial file
    /// left by a mid-stream failure is removed before the error is
    /// returned. A final progress update is always emitted on success.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the URL is invalid, the request fails,
    /// the server answers with an error status, or writing to disk fails.
    #[instrument(skip(self, progress), fields(url = %url, path = %path.display()))]
    pub(crate) async fn download_to_path(
        &self,
        url: &str,
        path: &Path,
        progress: Option<&ProgressScope<'_>>,
    ) -> Result<StreamOutcome, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url.to_string()))?;

        let response = self.send_get(url).await?;
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let mut file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path.to_path_buf(), e))?;

        let stream_result =
            stream_to_file(&mut file, response, url, path, content_length, progress).await;

        if stream_result.is_err() {
            debug!(path = %path.display(), "removing partial file after stream error");
            let _ = tokio::fs::remove_file(path).await;
        }
        let bytes_written = stream_result?;

        if let Some(scope) = progress {
            scope.emit(bytes_written, content_length);
        }
        debug!(bytes = bytes_written, "download stream complete");

        Ok(StreamOutcome {
            bytes_written,
            content_length,
        })
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let mut request = self.client.get(url);
        if let Some(token) = auth::current_token() {
            request = request.header(AUTHORIZATION, token.bearer());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let status = status.as_u16();
            if matches!(status, 401 | 403) {
                return Err(DownloadError::auth_required(url, status));
            }
            return Err(DownloadError::http_status(url, status));
        }
        Ok(response)
    }

    /// Returns the underlying reqwest client for operations this wrapper
    /// does not cover.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Streams the response body to `file`, returning bytes written.
///
/// Extracted so the caller can clean up the partial file on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
    content_length: Option<u64>,
    progress: Option<&ProgressScope<'_>>,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;
    let mut throttle = ProgressThrottle::new(PROGRESS_INTERVAL);

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path.to_path_buf(), e))?;
        bytes_written += chunk.len() as u64;

        if let Some(scope) = progress {
            if throttle.ready() {
                scope.emit(bytes_written, content_length);
            }
        }
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path.to_path_buf(), e))?;

    Ok(bytes_written)
}
