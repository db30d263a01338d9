//! Declarative input/output schemas for host nodes.
//!
//! The host introspects each node's schema to render input widgets:
//! required inputs are always shown, optional inputs are collapsible, and
//! hidden inputs are filled in by the host itself (the node id). The
//! serialized form is plain JSON.

use serde::Serialize;

/// One declared input.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InputSpec {
    /// Input name as it appears in [`crate::node::NodeInputs`].
    pub name: &'static str,
    /// Widget type and defaults.
    #[serde(flatten)]
    pub kind: InputKind,
}

/// Widget type plus its metadata.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum InputKind {
    /// Free-form text.
    #[serde(rename = "STRING")]
    String {
        /// Value used when the user leaves the widget untouched.
        default: String,
        /// Render as a multi-line editor.
        #[serde(skip_serializing_if = "is_false")]
        multiline: bool,
        /// Mask the value in the UI (tokens).
        #[serde(skip_serializing_if = "is_false")]
        password: bool,
    },

    /// On/off toggle.
    #[serde(rename = "BOOLEAN")]
    Boolean {
        /// Value used when the user leaves the widget untouched.
        default: bool,
    },

    /// Dropdown over a fixed list; the host preselects the first entry.
    #[serde(rename = "CHOICE")]
    Choice {
        /// The selectable values.
        choices: Vec<String>,
    },

    /// Host-provided unique node identifier; never rendered.
    #[serde(rename = "UNIQUE_ID")]
    UniqueId,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

impl InputSpec {
    /// A single-line string input.
    #[must_use]
    pub fn string(name: &'static str, default: &str) -> Self {
        Self {
            name,
            kind: InputKind::String {
                default: default.to_string(),
                multiline: false,
                password: false,
            },
        }
    }

    /// A password-masked string input (empty default).
    #[must_use]
    pub fn password(name: &'static str) -> Self {
        Self {
            name,
            kind: InputKind::String {
                default: String::new(),
                multiline: false,
                password: true,
            },
        }
    }

    /// A boolean toggle.
    #[must_use]
    pub fn boolean(name: &'static str, default: bool) -> Self {
        Self {
            name,
            kind: InputKind::Boolean { default },
        }
    }

    /// A dropdown over `choices`.
    #[must_use]
    pub fn choice(name: &'static str, choices: Vec<String>) -> Self {
        Self {
            name,
            kind: InputKind::Choice { choices },
        }
    }

    /// The hidden unique-id input.
    #[must_use]
    pub fn unique_id(name: &'static str) -> Self {
        Self {
            name,
            kind: InputKind::UniqueId,
        }
    }
}

/// A node's full input declaration.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct InputSchema {
    /// Inputs the host always renders.
    pub required: Vec<InputSpec>,
    /// Inputs the host renders collapsed, falling back to defaults.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<InputSpec>,
    /// Inputs the host fills in itself.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hidden: Vec<InputSpec>,
}

impl InputSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a required input.
    #[must_use]
    pub fn required(mut self, spec: InputSpec) -> Self {
        self.required.push(spec);
        self
    }

    /// Appends an optional input.
    #[must_use]
    pub fn optional(mut self, spec: InputSpec) -> Self {
        self.optional.push(spec);
        self
    }

    /// Appends a hidden input.
    #[must_use]
    pub fn hidden(mut self, spec: InputSpec) -> Self {
        self.hidden.push(spec);
        self
    }

    /// Looks an input up by name across all three sections.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&InputSpec> {
        self.required
            .iter()
            .chain(&self.optional)
            .chain(&self.hidden)
            .find(|spec| spec.name == name)
    }

    /// Serializes the schema for the host.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails, which for this
    /// data model would be a programming error.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// One declared output slot.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct OutputSpec {
    /// Output type tag (`STRING`).
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Output name shown on the node's socket.
    pub name: &'static str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_string_spec_serializes_with_type_tag() {
        let spec = InputSpec::string("repo_id", "runwayml/stable-diffusion-v1-5");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["name"], "repo_id");
        assert_eq!(json["type"], "STRING");
        assert_eq!(json["default"], "runwayml/stable-diffusion-v1-5");
        // Off flags are omitted entirely.
        assert!(json.get("multiline").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_password_spec_sets_flag() {
        let json = serde_json::to_value(InputSpec::password("hf_token")).unwrap();
        assert_eq!(json["password"], true);
        assert_eq!(json["default"], "");
    }

    #[test]
    fn test_choice_spec_lists_choices() {
        let spec = InputSpec::choice(
            "local_path",
            vec!["checkpoints".to_string(), "vae".to_string()],
        );
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "CHOICE");
        assert_eq!(json["choices"][0], "checkpoints");
    }

    #[test]
    fn test_schema_sections_and_find() {
        let schema = InputSchema::new()
            .required(InputSpec::string("repo_id", ""))
            .optional(InputSpec::boolean("overwrite", true))
            .hidden(InputSpec::unique_id("node_id"));

        assert!(schema.find("repo_id").is_some());
        assert!(schema.find("overwrite").is_some());
        assert!(schema.find("node_id").is_some());
        assert!(schema.find("nope").is_none());

        let json = schema.to_json().unwrap();
        assert_eq!(json["required"][0]["name"], "repo_id");
        assert_eq!(json["optional"][0]["default"], true);
        assert_eq!(json["hidden"][0]["type"], "UNIQUE_ID");
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let schema = InputSchema::new().required(InputSpec::string("filename", ""));
        let json = schema.to_json().unwrap();
        assert!(json.get("optional").is_none());
        assert!(json.get("hidden").is_none());
    }
}
