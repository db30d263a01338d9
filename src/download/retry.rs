//! Retry policy with exponential backoff for transient download failures.
//!
//! Failed attempts are classified into a [`FailureType`]; the
//! [`RetryPolicy`] turns the classification plus the attempt count into a
//! [`RetryDecision`], with exponential backoff and jitter on the retryable
//! paths.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, instrument};

use super::DownloadError;

/// Default maximum attempts (including the initial one).
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for the first retry.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Delay cap.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(32);

/// Backoff multiplier applied per attempt.
const DEFAULT_BACKOFF_MULTIPLIER: f32 = 2.0;

/// Maximum jitter added to each delay.
const MAX_JITTER: Duration = Duration::from_millis(500);

/// Classification of a download failure for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// May succeed on retry: timeouts, connection drops, 5xx.
    Transient,
    /// Will not succeed on retry: 404, bad request, invalid URL, local IO.
    Permanent,
    /// Needs a (different) hub token; retrying unauthenticated cannot help.
    NeedsAuth,
    /// Server rate limiting (429); retried with backoff.
    RateLimited,
}

/// Whether to retry a failed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the delay; `attempt` is the upcoming attempt number.
    Retry {
        /// How long to wait before retrying.
        delay: Duration,
        /// The upcoming attempt number (1-indexed).
        attempt: u32,
    },
    /// Give up.
    DoNotRetry {
        /// Human-readable reason.
        reason: String,
    },
}

/// Exponential-backoff retry configuration.
///
/// Delay formula: `min(base_delay * multiplier^(attempt-1), max_delay) + jitter`.
/// Defaults: 3 attempts, 1s base, 32s cap, 2.0 multiplier.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with custom settings; `max_attempts` is clamped to
    /// at least 1.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f32,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
            backoff_multiplier,
        }
    }

    /// Creates a policy overriding only `max_attempts`.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Returns the configured attempt ceiling.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides whether the attempt that just failed (1-indexed) should be
    /// followed by another.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        match failure_type {
            FailureType::Permanent => {
                return RetryDecision::DoNotRetry {
                    reason: "permanent failure".to_string(),
                };
            }
            FailureType::NeedsAuth => {
                return RetryDecision::DoNotRetry {
                    reason: "authentication required".to_string(),
                };
            }
            FailureType::Transient | FailureType::RateLimited => {}
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = self.calculate_delay(attempt);
        debug!(
            attempt,
            next_attempt = attempt + 1,
            delay_ms = delay.as_millis(),
            "will retry"
        );
        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }

    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let exponent = attempt.saturating_sub(1) as f64;
        let delay_ms = base_ms * f64::from(self.backoff_multiplier).powf(exponent);
        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped_ms as u64) + jitter()
    }
}

// Jitter spreads simultaneous retries apart.
fn jitter() -> Duration {
    let mut rng = rand::thread_rng();
    Duration::from_millis(rng.gen_range(0..=MAX_JITTER.as_millis() as u64))
}

/// Classifies a download error for retry purposes.
///
/// Statuses: 408/5xx transient, 429 rate-limited, 401/403 needs-auth,
/// other 4xx permanent. Timeouts and non-TLS network errors are transient;
/// TLS failures, local IO errors, and invalid URLs are permanent.
#[instrument]
pub fn classify_error(error: &DownloadError) -> FailureType {
    match error {
        DownloadError::HttpStatus { status, .. } => classify_http_status(*status),
        DownloadError::Timeout { .. } => FailureType::Transient,
        DownloadError::Network { source, .. } => {
            if is_tls_error(source) {
                FailureType::Permanent
            } else {
                FailureType::Transient
            }
        }
        DownloadError::AuthRequired { .. } => FailureType::NeedsAuth,
        DownloadError::Io { .. } | DownloadError::InvalidUrl { .. } => FailureType::Permanent,
    }
}

fn classify_http_status(status: u16) -> FailureType {
    match status {
        401 | 403 => FailureType::NeedsAuth,
        408 => FailureType::Transient,
        429 => FailureType::RateLimited,
        400..=499 => FailureType::Permanent,
        500..=599 => FailureType::Transient,
        _ => FailureType::Transient,
    }
}

// Certificate problems will not clear up by retrying.
fn is_tls_error(error: &reqwest::Error) -> bool {
    let rendered = format!("{error:?}").to_ascii_lowercase();
    rendered.contains("certificate") || rendered.contains("tls") || rendered.contains("handshake")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_failures_are_not_retried() {
        let policy = RetryPolicy::default();
        assert!(matches!(
            policy.should_retry(FailureType::Permanent, 1),
            RetryDecision::DoNotRetry { .. }
        ));
    }

    #[test]
    fn test_needs_auth_is_not_retried() {
        let policy = RetryPolicy::default();
        assert!(matches!(
            policy.should_retry(FailureType::NeedsAuth, 1),
            RetryDecision::DoNotRetry { .. }
        ));
    }

    #[test]
    fn test_transient_failure_retries_until_exhausted() {
        let policy = RetryPolicy::with_max_attempts(3);
        assert!(matches!(
            policy.should_retry(FailureType::Transient, 1),
            RetryDecision::Retry { attempt: 2, .. }
        ));
        assert!(matches!(
            policy.should_retry(FailureType::Transient, 2),
            RetryDecision::Retry { attempt: 3, .. }
        ));
        match policy.should_retry(FailureType::Transient, 3) {
            RetryDecision::DoNotRetry { reason } => {
                assert!(reason.contains("exhausted"), "{reason}");
            }
            other => panic!("expected DoNotRetry, got {other:?}"),
        }
    }

    #[test]
    fn test_backoff_grows_and_is_capped() {
        let policy = RetryPolicy::new(
            10,
            Duration::from_secs(1),
            Duration::from_secs(4),
            2.0,
        );
        let delay_for = |attempt| match policy.should_retry(FailureType::Transient, attempt) {
            RetryDecision::Retry { delay, .. } => delay,
            RetryDecision::DoNotRetry { reason } => panic!("unexpected: {reason}"),
        };
        // Jitter adds at most 500ms on top of the deterministic part.
        let d1 = delay_for(1);
        assert!(d1 >= Duration::from_secs(1) && d1 <= Duration::from_millis(1500));
        let d3 = delay_for(3);
        assert!(d3 >= Duration::from_secs(4) && d3 <= Duration::from_millis(4500));
        let d5 = delay_for(5);
        assert!(d5 <= Duration::from_millis(4500), "cap must hold: {d5:?}");
    }

    #[test]
    fn test_zero_max_attempts_is_clamped_to_one() {
        let policy = RetryPolicy::with_max_attempts(0);
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_classify_statuses() {
        let classify = |status| {
            classify_error(&DownloadError::http_status("https://hub.example/f", status))
        };
        assert_eq!(classify(404), FailureType::Permanent);
        assert_eq!(classify(400), FailureType::Permanent);
        assert_eq!(classify(408), FailureType::Transient);
        assert_eq!(classify(429), FailureType::RateLimited);
        assert_eq!(classify(500), FailureType::Transient);
        assert_eq!(classify(503), FailureType::Transient);
        assert_eq!(classify(401), FailureType::NeedsAuth);
        assert_eq!(classify(403), FailureType::NeedsAuth);
    }

    #[test]
    fn test_classify_non_http_errors() {
        assert_eq!(
            classify_error(&DownloadError::timeout("https://hub.example/f")),
            FailureType::Transient
        );
        assert_eq!(
            classify_error(&DownloadError::invalid_url("nope")),
            FailureType::Permanent
        );
        assert_eq!(
            classify_error(&DownloadError::auth_required("https://hub.example/f", 401)),
            FailureType::NeedsAuth
        );
        let io = std::io::Error::other("disk full");
        assert_eq!(
            classify_error(&DownloadError::io(std::path::PathBuf::from("/x"), io)),
            FailureType::Permanent
        );
    }
}
