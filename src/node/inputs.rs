//! Input and output value bags crossing the host boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::NodeError;

/// A host-supplied widget value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    /// Text widget value.
    String(String),
    /// Toggle widget value.
    Boolean(bool),
}

/// The values the host collected for one node execution.
#[derive(Debug, Clone, Default)]
pub struct NodeInputs {
    values: HashMap<String, Value>,
}

impl NodeInputs {
    /// Creates an empty input bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a string value.
    pub fn set_string(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), Value::String(value.into()));
    }

    /// Inserts a boolean value.
    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
        self.values.insert(name.into(), Value::Boolean(value));
    }

    /// Chainable [`Self::set_string`].
    #[must_use]
    pub fn with_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_string(name, value);
        self
    }

    /// Chainable [`Self::set_bool`].
    #[must_use]
    pub fn with_bool(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set_bool(name, value);
        self
    }

    /// Returns the string value of `name`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::InvalidInput`] when the value exists with a
    /// different type: the host wired an incompatible upstream output.
    pub fn opt_str(&self, name: &str) -> Result<Option<&str>, NodeError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(NodeError::invalid_input(name, "STRING")),
        }
    }

    /// Returns the string value of `name`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::InvalidInput`] on a type mismatch.
    pub fn str_or(&self, name: &str, default: &str) -> Result<String, NodeError> {
        Ok(self.opt_str(name)?.unwrap_or(default).to_string())
    }

    /// Returns the boolean value of `name`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::InvalidInput`] on a type mismatch.
    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, NodeError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(Value::Boolean(b)) => Ok(*b),
            Some(_) => Err(NodeError::invalid_input(name, "BOOLEAN")),
        }
    }
}

/// Ordered output values handed to downstream nodes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeOutputs {
    values: Vec<Value>,
}

impl NodeOutputs {
    /// Creates a single-string output tuple.
    #[must_use]
    pub fn single_string(value: impl Into<String>) -> Self {
        Self {
            values: vec![Value::String(value.into())],
        }
    }

    /// Returns the output slots in declaration order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the first output as a string, when it is one.
    #[must_use]
    pub fn first_string(&self) -> Option<&str> {
        match self.values.first() {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}
