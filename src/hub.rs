//! Hub repository identifiers and resolve-URL construction.
//!
//! Files are addressed on the hub as
//! `<endpoint>/<repo_id>/resolve/main/<filename>`. This module validates the
//! pieces and builds that URL; it never talks to the network itself.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

/// Default hub endpoint, overridable via [`crate::config::HUB_ENDPOINT_ENV`].
pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";

/// Revision files are resolved against. The node schemas expose no revision
/// input, so this stays fixed.
const HUB_REVISION: &str = "main";

// `namespace/name`: exactly one slash, both segments starting alphanumeric,
// then alphanumerics plus `.`, `_`, `-`.
static REPO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"^[A-Za-z0-9][A-Za-z0-9._-]*/[A-Za-z0-9][A-Za-z0-9._-]*$")
});

/// Errors raised while building a hub URL.
#[derive(Debug, Error)]
pub enum HubError {
    /// The repository identifier is not of `namespace/name` form.
    #[error("invalid repository id {repo_id:?}: expected namespace/name")]
    InvalidRepoId {
        /// The rejected identifier.
        repo_id: String,
    },

    /// The filename is empty or escapes the repository tree.
    #[error("invalid hub filename {filename:?}")]
    InvalidFilename {
        /// The rejected filename.
        filename: String,
    },

    /// The configured endpoint is not a valid absolute URL.
    #[error("invalid hub endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        /// The rejected endpoint.
        endpoint: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

/// Validates a `namespace/name` repository identifier.
///
/// # Errors
///
/// Returns [`HubError::InvalidRepoId`] when the identifier does not match.
pub fn validate_repo_id(repo_id: &str) -> Result<(), HubError> {
    if REPO_ID_RE.is_match(repo_id) {
        Ok(())
    } else {
        Err(HubError::InvalidRepoId {
            repo_id: repo_id.to_string(),
        })
    }
}

/// Builds the resolve URL for `filename` in `repo_id` at the fixed revision.
///
/// Filename subpath separators are preserved; every other character of each
/// segment is percent-encoded so arbitrary model filenames survive the trip.
///
/// # Errors
///
/// Returns [`HubError`] when the endpoint, repository id, or filename is
/// invalid.
pub fn resolve_file_url(endpoint: &str, repo_id: &str, filename: &str) -> Result<String, HubError> {
    let endpoint = endpoint.trim_end_matches('/');
    Url::parse(endpoint).map_err(|e| HubError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source: e,
    })?;
    validate_repo_id(repo_id)?;

    if filename.is_empty() || filename.starts_with('/') {
        return Err(HubError::InvalidFilename {
            filename: filename.to_string(),
        });
    }
    let mut encoded_segments = Vec::new();
    for segment in filename.split('/') {
        if matches!(segment, "" | "." | "..") {
            return Err(HubError::InvalidFilename {
                filename: filename.to_string(),
            });
        }
        encoded_segments.push(urlencoding::encode(segment).into_owned());
    }
    let encoded = encoded_segments.join("/");

    Ok(format!("{endpoint}/{repo_id}/resolve/{HUB_REVISION}/{encoded}"))
}

/// Compiles a pattern known to be valid at compile time.
///
/// # Panics
///
/// Panics if the static pattern is invalid, which is a programming error.
#[allow(clippy::expect_used)]
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex pattern must compile")
}
