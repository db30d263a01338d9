//! Shared User-Agent string for hub HTTP traffic.
//!
//! Single source for the UA format so every request the node pack makes
//! identifies itself consistently (good citizenship; RFC 9308).

/// Default User-Agent for hub download requests (identifies the node pack).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("hub-downloader/{version} (node-graph plugin)")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_crate_version() {
        let ua = default_user_agent();
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("hub-downloader/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must carry the crate version: {ua}"
        );
    }
}
