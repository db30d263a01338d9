//! Hub download node: fetch one model file from a repository into the
//! models tree.

use async_trait::async_trait;
use tracing::{info, warn};

use super::schema::{InputSchema, InputSpec, OutputSpec};
use super::{HostContext, Node, NodeError, NodeInputs, NodeOutputs};
use crate::download::DownloadRequest;
use crate::progress::ProgressScope;
use crate::{hub, paths};

pub(super) const DEFAULT_REPO_ID: &str = "runwayml/stable-diffusion-v1-5";
const DEFAULT_FILENAME: &str = "v1-5-pruned-emaonly.ckpt";

const OUTPUTS: &[OutputSpec] = &[OutputSpec {
    kind: "STRING",
    name: "filename",
}];

/// Downloads a file from a hub repository into a models directory chosen
/// from the enumerated list (or an explicit override path).
#[derive(Debug, Default)]
pub struct HfDownloader;

impl HfDownloader {
    /// Creates the node.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Node for HfDownloader {
    fn class_name(&self) -> &'static str {
        "HFDownloader"
    }

    fn display_name(&self) -> &'static str {
        "HF Download"
    }

    fn category(&self) -> &'static str {
        "loaders/download"
    }

    fn input_schema(&self, config: &crate::config::Config) -> InputSchema {
        InputSchema::new()
            .required(InputSpec::string("repo_id", DEFAULT_REPO_ID))
            .required(InputSpec::string("filename", DEFAULT_FILENAME))
            .required(InputSpec::choice(
                "local_path",
                paths::model_dirs(config.models_root()),
            ))
            .optional(InputSpec::boolean("overwrite", true))
            .optional(InputSpec::string("local_path_override", ""))
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
        let repo_id = inputs.str_or("repo_id", "")?;
        let filename = inputs.str_or("filename", "")?;
        let local_path = inputs.str_or("local_path", "")?;
        let local_path_override = inputs.str_or("local_path_override", "")?;
        let overwrite = inputs.bool_or("overwrite", true)?;
        let node_id = inputs.str_or("node_id", "")?;

        // The override wins whenever the user typed anything into it.
        let target_dir = if local_path_override.trim().is_empty() {
            local_path
        } else {
            local_path_override
        };

        run_hub_download(
            HubDownloadArgs {
                repo_id: &repo_id,
                filename: &filename,
                target_dir: &target_dir,
                overwrite,
                node_id: &node_id,
            },
            ctx,
        )
        .await
    }
}

/// Arguments for one hub file download, shared by both node classes.
pub(super) struct HubDownloadArgs<'a> {
    pub(super) repo_id: &'a str,
    pub(super) filename: &'a str,
    pub(super) target_dir: &'a str,
    pub(super) overwrite: bool,
    pub(super) node_id: &'a str,
}

/// Validates, resolves, delegates, and yields the filename output.
///
/// Missing required strings are not an execution failure: the node logs
/// and yields an empty filename so the rest of the graph keeps running.
pub(super) async fn run_hub_download(
    args: HubDownloadArgs<'_>,
    ctx: &HostContext,
) -> Result<NodeOutputs, NodeError> {
    let repo_id = args.repo_id.trim();
    let filename = args.filename.trim();
    if repo_id.is_empty() || filename.is_empty() {
        warn!(
            repo_id,
            filename, "missing required values, yielding empty filename"
        );
        return Ok(NodeOutputs::single_string(""));
    }

    info!(
        repo_id,
        filename,
        target_dir = %args.target_dir,
        node_id = %args.node_id,
        overwrite = args.overwrite,
        "downloading model file"
    );

    let save_path =
        paths::prepare_download_path(ctx.config().models_root(), args.target_dir, filename)?;
    let url = hub::resolve_file_url(ctx.config().hub_endpoint(), repo_id, filename)?;

    let scope = ProgressScope::new(ctx.reporter(), args.node_id, filename);
    ctx.download_manager()
        .download_with_progress(DownloadRequest {
            url: &url,
            save_path: &save_path,
            overwrite: args.overwrite,
            progress: Some(scope),
        })
        .await?;

    // Downstream nodes receive the filename, not the path: they resolve it
    // against the same models tree.
    Ok(NodeOutputs::single_string(filename))
}
