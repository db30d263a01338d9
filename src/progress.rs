//! Progress reporting back to the host UI.
//!
//! Downloads can take minutes; the host renders a per-node progress bar.
//! The download manager emits [`ProgressUpdate`]s through whatever
//! [`ProgressReporter`] the host installed on the execution context, routed
//! by the hidden `node_id` input so the host can address the right widget.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

/// A progress snapshot for one node's download.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// The executing node, from the hidden `node_id` input.
    pub node_id: String,
    /// The file being downloaded.
    pub filename: String,
    /// Bytes written so far.
    pub bytes_downloaded: u64,
    /// Expected total from Content-Length, when the server sent one.
    pub total_bytes: Option<u64>,
}

/// Sink for progress updates. Implemented by the host; the default
/// [`LogReporter`] writes to the log stream.
pub trait ProgressReporter: Send + Sync {
    /// Delivers one update. Implementations must not block the download.
    fn report(&self, update: &ProgressUpdate);
}

/// Reporter that logs updates instead of driving a UI.
#[derive(Debug, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&self, update: &ProgressUpdate) {
        debug!(
            node_id = %update.node_id,
            filename = %update.filename,
            bytes = update.bytes_downloaded,
            total = ?update.total_bytes,
            "download progress"
        );
    }
}

/// One download's reporting scope: the reporter plus the routing fields
/// every update carries.
#[derive(Clone, Copy)]
pub struct ProgressScope<'a> {
    reporter: &'a dyn ProgressReporter,
    node_id: &'a str,
    filename: &'a str,
}

impl<'a> ProgressScope<'a> {
    /// Creates a scope for one node execution.
    #[must_use]
    pub fn new(reporter: &'a dyn ProgressReporter, node_id: &'a str, filename: &'a str) -> Self {
        Self {
            reporter,
            node_id,
            filename,
        }
    }

    /// Emits one update through the reporter.
    pub fn emit(&self, bytes_downloaded: u64, total_bytes: Option<u64>) {
        self.reporter.report(&ProgressUpdate {
            node_id: self.node_id.to_string(),
            filename: self.filename.to_string(),
            bytes_downloaded,
            total_bytes,
        });
    }
}

// Manual Debug: the `&dyn` reporter has no Debug bound.
impl std::fmt::Debug for ProgressScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressScope")
            .field("node_id", &self.node_id)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Interval gate for progress emission, so a fast stream does not flood the
/// host with one update per chunk.
#[derive(Debug)]
pub(crate) struct ProgressThrottle {
    interval: Duration,
    last_emit: Option<Instant>,
}

impl ProgressThrottle {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
        }
    }

    /// Returns true when enough time has passed since the last emission,
    /// recording this emission. The first call always fires.
    pub(crate) fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::CollectingReporter;

    #[test]
    fn test_scope_routes_node_id_and_filename() {
        let reporter = CollectingReporter::default();
        let scope = ProgressScope::new(&reporter, "17", "model.ckpt");
        scope.emit(512, Some(1024));

        let updates = reporter.updates.lock().unwrap();
        assert_eq!(
            *updates,
            vec![ProgressUpdate {
                node_id: "17".to_string(),
                filename: "model.ckpt".to_string(),
                bytes_downloaded: 512,
                total_bytes: Some(1024),
            }]
        );
    }

    #[test]
    fn test_update_serializes_for_the_host() {
        let update = ProgressUpdate {
            node_id: "3".to_string(),
            filename: "w.safetensors".to_string(),
            bytes_downloaded: 10,
            total_bytes: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["node_id"], "3");
        assert_eq!(json["bytes_downloaded"], 10);
        assert!(json["total_bytes"].is_null());
    }

    #[test]
    fn test_throttle_first_call_fires_then_gates() {
        let mut throttle = ProgressThrottle::new(Duration::from_secs(60));
        assert!(throttle.ready(), "first call always fires");
        assert!(!throttle.ready(), "immediate second call is gated");
    }

    #[test]
    fn test_throttle_zero_interval_always_fires() {
        let mut throttle = ProgressThrottle::new(Duration::ZERO);
        assert!(throttle.ready());
        assert!(throttle.ready());
    }
}
