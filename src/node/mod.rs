//! The host node contract and the download nodes implementing it.
//!
//! A node declares what it needs (input schema), what it yields (output
//! specs), and exposes one async entry point the host calls per graph
//! execution. The host discovers nodes through the [`NodeRegistry`].

mod error;
mod hf_auth_download;
mod hf_download;
mod inputs;
mod registry;
mod schema;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::download::DownloadManager;
use crate::progress::{LogReporter, ProgressReporter};

pub use error::NodeError;
pub use hf_auth_download::HfAuthDownloader;
pub use hf_download::HfDownloader;
pub use inputs::{NodeInputs, NodeOutputs, Value};
pub use registry::{NodeRegistry, build_default_node_registry};
pub use schema::{InputKind, InputSchema, InputSpec, OutputSpec};

/// Everything the host provides a node during execution: configuration,
/// the shared download manager, and the progress reporter driving the UI.
pub struct HostContext {
    config: Config,
    manager: DownloadManager,
    reporter: Arc<dyn ProgressReporter>,
}

impl HostContext {
    /// Creates a context with a manager built from `config` and a
    /// log-backed progress reporter.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let manager = DownloadManager::new(&config);
        Self {
            config,
            manager,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Installs the host's progress reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replaces the download manager, e.g. with a tuned retry policy.
    #[must_use]
    pub fn with_download_manager(mut self, manager: DownloadManager) -> Self {
        self.manager = manager;
        self
    }

    /// Returns the plugin configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the shared download manager.
    #[must_use]
    pub fn download_manager(&self) -> &DownloadManager {
        &self.manager
    }

    /// Returns the progress reporter.
    #[must_use]
    pub fn reporter(&self) -> &dyn ProgressReporter {
        self.reporter.as_ref()
    }
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A unit of computation in the host's visual graph.
#[async_trait]
pub trait Node: Send + Sync {
    /// Host-facing class identifier, stable across releases because saved
    /// graphs reference it.
    fn class_name(&self) -> &'static str;

    /// Human-readable name shown in the node picker.
    fn display_name(&self) -> &'static str;

    /// Picker category path.
    fn category(&self) -> &'static str;

    /// Declares the node's inputs. Takes the config because choice inputs
    /// may enumerate the filesystem (model directories).
    fn input_schema(&self, config: &Config) -> InputSchema;

    /// Declares the node's output slots.
    fn outputs(&self) -> &'static [OutputSpec];

    /// Executes the node once with the host-collected inputs.
    async fn execute(
        &self,
        inputs: &NodeInputs,
        ctx: &HostContext,
    ) -> Result<NodeOutputs, NodeError>;
}
