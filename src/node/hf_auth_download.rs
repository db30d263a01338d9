//! Token-authenticated hub download node.
//!
//! Same download path as [`super::HfDownloader`], but the entry point logs
//! in with the supplied token first, so gated and private repositories
//! work. Login mutates process-wide hub state; a login failure is logged
//! and propagated unchanged to the host.

use async_trait::async_trait;
use tracing::error;

use super::hf_download::{DEFAULT_REPO_ID, HubDownloadArgs, run_hub_download};
use super::schema::{InputSchema, InputSpec, OutputSpec};
use super::{HostContext, Node, NodeError, NodeInputs, NodeOutputs};
use crate::auth;

const DEFAULT_FILENAME: &str = "v1-5-pruned.ckpt";
const DEFAULT_LOCAL_PATH: &str = "checkpoints";

const OUTPUTS: &[OutputSpec] = &[OutputSpec {
    kind: "STRING",
    name: "filename",
}];

/// Downloads a file from a gated or private hub repository, logging in
/// with the given token first.
#[derive(Debug, Default)]
pub struct HfAuthDownloader;

impl HfAuthDownloader {
    /// Creates the node.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Node for HfAuthDownloader {
    fn class_name(&self) -> &'static str {
        "HFAuthDownloader"
    }

    fn display_name(&self) -> &'static str {
        "HF Download (Authenticated)"
    }

    fn category(&self) -> &'static str {
        "loaders/download"
    }

    fn input_schema(&self, _config: &crate::config::Config) -> InputSchema {
        // local_path is free text here, not a dropdown: private-model
        // workflows tend to target custom directories.
        InputSchema::new()
            .required(InputSpec::string("repo_id", DEFAULT_REPO_ID))
            .required(InputSpec::string("filename", DEFAULT_FILENAME))
            .required(InputSpec::string("local_path", DEFAULT_LOCAL_PATH))
            .required(InputSpec::password("hf_token"))
            .required(InputSpec::boolean("overwrite", false))
            .hidden(InputSpec::unique_id("node_id"))
    }

    fn outputs(&self) -> &'static [OutputSpec] {
        OUTPUTS
    }

    async fn execute(
        &self,
        inputs: &NodeInputs,
        ctx: &HostContext,
    ) -> Result<NodeOutputs, NodeError> {
        let token = inputs.str_or("hf_token", "")?;

        // Login always precedes delegation; its error passes through
        // unchanged so the host can show the auth failure as-is.
        if let Err(e) = auth::login(&token) {
            error!(error = %e, "hub login failed");
            return Err(e.into());
        }

        let repo_id = inputs.str_or("repo_id", "")?;
        let filename = inputs.str_or("filename", "")?;
        let local_path = inputs.str_or("local_path", DEFAULT_LOCAL_PATH)?;
        let overwrite = inputs.bool_or("overwrite", false)?;
        let node_id = inputs.str_or("node_id", "")?;

        run_hub_download(
            HubDownloadArgs {
                repo_id: &repo_id,
                filename: &filename,
                target_dir: &local_path,
                overwrite,
                node_id: &node_id,
            },
            ctx,
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::auth::AuthError;
    use crate::test_support::TOKEN_LOCK;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path as url_path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_schema_requires_a_masked_token() {
        let node = HfAuthDownloader::new();
        let schema = node.input_schema(&Config::default());
        let token = schema.find("hf_token").expect("hf_token declared");
        match &token.kind {
            crate::node::InputKind::String { password, .. } => assert!(*password),
            other => panic!("hf_token must be a STRING input, got {other:?}"),
        }
        // The auth variant declares overwrite as required, defaulting off.
        assert!(schema.required.iter().any(|s| s.name == "overwrite"));
    }

    #[tokio::test]
    async fn test_empty_token_fails_before_any_download() {
        let _lock = TOKEN_LOCK.lock().unwrap();
        let root = TempDir::new().unwrap();
        let ctx = HostContext::new(
            Config::default()
                .with_models_root(root.path())
                .with_hub_endpoint("https://127.0.0.1:1"),
        );
        let inputs = NodeInputs::new()
            .with_string("repo_id", "org/private-model")
            .with_string("filename", "w.ckpt")
            .with_string("hf_token", "");

        let result = HfAuthDownloader::new().execute(&inputs, &ctx).await;
        match result {
            Err(NodeError::Auth(AuthError::EmptyToken)) => {}
            other => panic!("login error must propagate unchanged, got {other:?}"),
        }
        assert!(
            !root.path().join(DEFAULT_LOCAL_PATH).exists(),
            "no path work may happen after a failed login"
        );
    }

    #[tokio::test]
    async fn test_login_happens_before_delegation_and_sends_bearer() {
        let _lock = TOKEN_LOCK.lock().unwrap();
        let server = MockServer::start().await;
        let root = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(url_path("/org/private-model/resolve/main/w.ckpt"))
            .and(header("authorization", "Bearer hf_auth_node_test"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"private weights"))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .with_priority(u8::MAX)
            .mount(&server)
            .await;

        let ctx = HostContext::new(
            Config::default()
                .with_models_root(root.path())
                .with_hub_endpoint(server.uri()),
        );
        let inputs = NodeInputs::new()
            .with_string("repo_id", "org/private-model")
            .with_string("filename", "w.ckpt")
            .with_string("local_path", "checkpoints")
            .with_string("hf_token", "hf_auth_node_test")
            .with_bool("overwrite", true)
            .with_string("node_id", "11");

        let outputs = HfAuthDownloader::new().execute(&inputs, &ctx).await;
        crate::auth::logout();

        let outputs = outputs.unwrap();
        assert_eq!(outputs.first_string(), Some("w.ckpt"));
        assert_eq!(
            std::fs::read(root.path().join("checkpoints").join("w.ckpt")).unwrap(),
            b"private weights"
        );
    }

    #[tokio::test]
    async fn test_empty_repo_id_still_yields_empty_output_after_login() {
        let _lock = TOKEN_LOCK.lock().unwrap();
        let root = TempDir::new().unwrap();
        let ctx = HostContext::new(
            Config::default()
                .with_models_root(root.path())
                .with_hub_endpoint("https://127.0.0.1:1"),
        );
        let inputs = NodeInputs::new()
            .with_string("repo_id", "")
            .with_string("filename", "w.ckpt")
            .with_string("hf_token", "hf_valid_token");

        let outputs = HfAuthDownloader::new().execute(&inputs, &ctx).await.unwrap();
        crate::auth::logout();
        assert_eq!(outputs.first_string(), Some(""));
    }
}
