//! Constants for the download module (timeouts, progress cadence).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes; model files are large).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Minimum interval between progress updates sent to the host.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);
