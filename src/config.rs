//! Plugin configuration: models root, hub endpoint, HTTP timeouts.
//!
//! The host loads this node pack from a directory it controls, so
//! configuration is deliberately lightweight: compile-time defaults, an
//! optional `config.toml` scanned key-by-key (absent or unparseable files
//! fall back silently), and environment overrides applied last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::download::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use crate::hub::DEFAULT_HUB_ENDPOINT;

/// Environment variable overriding the models root directory.
pub const MODELS_ROOT_ENV: &str = "HUB_DOWNLOADER_MODELS_ROOT";

/// Environment variable overriding the hub endpoint (hub-client convention).
pub const HUB_ENDPOINT_ENV: &str = "HF_ENDPOINT";

/// Configuration shared by every node execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    models_root: PathBuf,
    hub_endpoint: String,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models_root: PathBuf::from("models"),
            hub_endpoint: DEFAULT_HUB_ENDPOINT.to_string(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads configuration from `config.toml` in `plugin_dir`, then applies
    /// environment overrides.
    ///
    /// A missing or unparseable file is not an error: the host must be able
    /// to load the node pack before the user has written any configuration.
    #[must_use]
    pub fn load(plugin_dir: &Path) -> Self {
        let mut config = Self::default();
        config.apply_file(&plugin_dir.join("config.toml"));
        config.apply_env();
        config
    }

    /// Returns the directory model files are organized under.
    #[must_use]
    pub fn models_root(&self) -> &Path {
        &self.models_root
    }

    /// Returns the hub endpoint download URLs are built against.
    #[must_use]
    pub fn hub_endpoint(&self) -> &str {
        &self.hub_endpoint
    }

    /// Returns the HTTP connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the HTTP read timeout.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Replaces the models root (host override or tests).
    #[must_use]
    pub fn with_models_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.models_root = root.into();
        self
    }

    /// Replaces the hub endpoint (host override or tests).
    #[must_use]
    pub fn with_hub_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.hub_endpoint = endpoint.into();
        self
    }

    /// Replaces both HTTP timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_secs: u64, read_secs: u64) -> Self {
        self.connect_timeout_secs = connect_secs;
        self.read_timeout_secs = read_secs;
        self
    }

    /// Scans `path` for known keys. Unknown lines are ignored so the file
    /// can carry host-specific settings this crate does not understand.
    fn apply_file(&mut self, path: &Path) {
        let Ok(raw) = std::fs::read_to_string(path) else {
            debug!(path = %path.display(), "no config file, using defaults");
            return;
        };
        for line in raw.lines() {
            let line = line.trim();
            if let Some(val) = strip_key(line, "models_root") {
                if !val.is_empty() {
                    self.models_root = PathBuf::from(val);
                }
            } else if let Some(val) = strip_key(line, "hub_endpoint") {
                if !val.is_empty() {
                    self.hub_endpoint = val.to_string();
                }
            } else if let Some(val) = strip_key(line, "connect_timeout_secs") {
                if let Ok(n) = val.parse::<u64>() {
                    if n > 0 {
                        self.connect_timeout_secs = n;
                    }
                }
            } else if let Some(val) = strip_key(line, "read_timeout_secs") {
                if let Ok(n) = val.parse::<u64>() {
                    if n > 0 {
                        self.read_timeout_secs = n;
                    }
                }
            }
        }
        debug!(path = %path.display(), "applied config file");
    }

    fn apply_env(&mut self) {
        if let Ok(root) = std::env::var(MODELS_ROOT_ENV) {
            let root = root.trim();
            if !root.is_empty() {
                self.models_root = PathBuf::from(root);
            }
        }
        if let Ok(endpoint) = std::env::var(HUB_ENDPOINT_ENV) {
            let endpoint = endpoint.trim();
            if !endpoint.is_empty() {
                self.hub_endpoint = endpoint.to_string();
            }
        }
    }
}

/// Extracts the value of a `key = "value"` line, stripping quotes and the
/// assignment punctuation. Returns `None` when the line is for another key.
fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=')?;
    Some(rest.trim().trim_matches('"'))
}
