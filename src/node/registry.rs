//! Node registry the host loads the pack through.

use tracing::debug;

use super::{HfAuthDownloader, HfDownloader, Node};

/// The set of node classes this pack exports.
///
/// The host asks for the class list at load time and looks nodes up by
/// class name when executing a saved graph.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: Vec<Box<dyn Node>>,
}

impl NodeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node class. Lookup returns the first match, so
    /// duplicate registration is a packaging mistake, not a panic.
    pub fn register(&mut self, node: Box<dyn Node>) {
        debug!(class = node.class_name(), "registering node class");
        self.nodes.push(node);
    }

    /// Looks a node class up by its host-facing name.
    #[must_use]
    pub fn get(&self, class_name: &str) -> Option<&dyn Node> {
        self.nodes
            .iter()
            .find(|n| n.class_name() == class_name)
            .map(AsRef::as_ref)
    }

    /// Returns `(class_name, display_name)` pairs for the host's picker.
    #[must_use]
    pub fn class_mappings(&self) -> Vec<(&'static str, &'static str)> {
        self.nodes
            .iter()
            .map(|n| (n.class_name(), n.display_name()))
            .collect()
    }

    /// Returns the number of registered node classes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builds the registry with every node class this pack ships.
#[must_use]
pub fn build_default_node_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    registry.register(Box::new(HfDownloader::new()));
    registry.register(Box::new(HfAuthDownloader::new()));
    registry
}
