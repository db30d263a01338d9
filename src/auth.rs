//! Process-wide hub authentication state.
//!
//! The authenticated download node calls [`login`] with the token it was
//! given; every hub request made afterwards, by any node in the process,
//! attaches `Authorization: Bearer <token>`. This mirrors the hub client
//! convention where login mutates shared client state rather than being
//! scoped to one call.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tracing::info;

static HUB_TOKEN: RwLock<Option<HubToken>> = RwLock::new(None);

/// A bearer token for hub requests.
///
/// `Debug` is redacted so tokens cannot leak through logs or error chains.
#[derive(Clone, PartialEq, Eq)]
pub struct HubToken(String);

impl HubToken {
    /// Returns the raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for HubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HubToken(***)")
    }
}

/// Errors raised by [`login`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token was empty or whitespace-only.
    #[error("hub token is empty")]
    EmptyToken,

    /// The token contains characters that cannot appear in a bearer token.
    #[error("hub token is malformed: {reason}")]
    MalformedToken {
        /// Why the token was rejected.
        reason: &'static str,
    },
}

/// Validates `token` and stores it as the process-wide hub credential.
///
/// # Errors
///
/// Returns [`AuthError`] when the token is empty or malformed. The stored
/// state is left untouched on error.
pub fn login(token: &str) -> Result<(), AuthError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AuthError::MalformedToken {
            reason: "token must not contain whitespace or control characters",
        });
    }

    *HUB_TOKEN.write().unwrap_or_else(PoisonError::into_inner) = Some(HubToken(token.to_string()));
    info!("hub login succeeded");
    Ok(())
}

/// Clears the process-wide hub credential.
pub fn logout() {
    *HUB_TOKEN.write().unwrap_or_else(PoisonError::into_inner) = None;
    info!("hub credential cleared");
}

/// Returns the currently stored credential, if any.
#[must_use]
pub fn current_token() -> Option<HubToken> {
    HUB_TOKEN
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
