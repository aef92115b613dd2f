use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use quasar_parameter::ParameterSpec;
use serde_json::Value;

use crate::handler::Handler;

/// One version of one action: name, description, version, declared
/// inputs, output example, and the handler body.
///
/// `(name, version)` is unique within a registry. A definition that
/// never declares a version registers as version 1.
///
/// # Example
///
/// ```rust
/// use quasar_action::definition::ActionDefinition;
/// use quasar_action::handler::handler_fn;
/// use quasar_parameter::LeafSpec;
///
/// let def = ActionDefinition::new(
///     "status",
///     handler_fn(|_, response| {
///         response.set("ok", true);
///         Ok(())
///     }),
/// )
/// .with_description("Report liveness")
/// .with_version(2)
/// .with_input("verbose", LeafSpec::new());
///
/// assert_eq!(def.version, 2);
/// ```
#[derive(Clone)]
pub struct ActionDefinition {
    /// Unique action name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Positive version number; defaults to 1.
    pub version: u32,
    /// Declared inputs, in declaration (= validation) order.
    pub inputs: IndexMap<String, ParameterSpec>,
    /// Example of a successful response body, for documentation.
    pub output_example: Option<Value>,
    /// The run body.
    pub handler: Arc<dyn Handler>,
}

impl ActionDefinition {
    /// Create a version-1 definition with no inputs.
    pub fn new(name: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: 1,
            inputs: IndexMap::new(),
            output_example: None,
            handler,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set an explicit version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Declare an input. Declaration order is validation order.
    #[must_use]
    pub fn with_input(mut self, key: impl Into<String>, spec: impl Into<ParameterSpec>) -> Self {
        self.inputs.insert(key.into(), spec.into());
        self
    }

    /// Attach an output example.
    #[must_use]
    pub fn with_output_example(mut self, example: Value) -> Self {
        self.output_example = Some(example);
        self
    }
}

impl fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("inputs", &self.inputs.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
