//! Error type surfaced to the host when a node execution fails.

use thiserror::Error;

use crate::auth::AuthError;
use crate::download::DownloadError;
use crate::hub::HubError;
use crate::paths::PathError;

/// Errors a node execution can raise to the host.
///
/// The host treats any of these as a failed node and surfaces the message
/// on the graph; downstream nodes are not executed.
#[derive(Debug, Error)]
pub enum NodeError {
    /// An input value exists but with the wrong type.
    #[error("input {name:?} must be a {expected} value")]
    InvalidInput {
        /// The input name.
        name: String,
        /// The declared widget type.
        expected: &'static str,
    },

    /// Hub login failed; propagated unchanged from [`crate::auth::login`].
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The hub URL could not be built.
    #[error(transparent)]
    Hub(#[from] HubError),

    /// The save path could not be resolved or created.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The transfer itself failed.
    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl NodeError {
    /// Creates a type-mismatch error for `name`.
    pub fn invalid_input(name: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidInput {
            name: name.into(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let msg = NodeError::invalid_input("overwrite", "BOOLEAN").to_string();
        assert!(msg.contains("overwrite"), "{msg}");
        assert!(msg.contains("BOOLEAN"), "{msg}");
    }

    #[test]
    fn test_auth_error_passes_through_unchanged() {
        let err = NodeError::from(AuthError::EmptyToken);
        assert_eq!(err.to_string(), AuthError::EmptyToken.to_string());
    }
}
