use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::steps::{FormatterFn, FormatterRef, StepContext, ValidatorFn, ValidatorRef};

/// A default for an absent parameter: a static value or a zero-argument
/// producer invoked at substitution time.
#[derive(Clone)]
pub enum DefaultValue {
    /// Fixed value substituted as-is.
    Static(Value),
    /// Producer invoked once per substitution.
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Materialize the default.
    #[must_use]
    pub fn produce(&self) -> Value {
        match self {
            Self::Static(value) => value.clone(),
            Self::Producer(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Declarative specification for one action input.
///
/// A spec is either leaf-shaped — validated directly against a single
/// value — or schema-shaped, nesting further specs that are validated
/// recursively. Never both.
///
/// # Example
///
/// ```rust
/// use quasar_parameter::spec::{LeafSpec, SchemaSpec, ParameterSpec};
/// use serde_json::json;
///
/// let spec: ParameterSpec = SchemaSpec::new()
///     .required()
///     .child("host", LeafSpec::new().required())
///     .child("port", LeafSpec::new().default_value(json!(5432)))
///     .into();
/// assert!(spec.is_schema());
/// ```
#[derive(Debug, Clone)]
pub enum ParameterSpec {
    /// Validated directly against a single value.
    Leaf(LeafSpec),
    /// Nests child specs, validated recursively.
    Schema(SchemaSpec),
}

impl ParameterSpec {
    /// Whether this spec (or its container, for schema specs) is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        match self {
            Self::Leaf(leaf) => leaf.required,
            Self::Schema(schema) => schema.required,
        }
    }

    /// The declared default, if any.
    #[must_use]
    pub fn default(&self) -> Option<&DefaultValue> {
        match self {
            Self::Leaf(leaf) => leaf.default.as_ref(),
            Self::Schema(schema) => schema.default.as_ref(),
        }
    }

    /// Whether this spec nests a child schema.
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

impl From<LeafSpec> for ParameterSpec {
    fn from(leaf: LeafSpec) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<SchemaSpec> for ParameterSpec {
    fn from(schema: SchemaSpec) -> Self {
        Self::Schema(schema)
    }
}

/// A leaf specification: required flag, default, and ordered formatter
/// and validator chains.
#[derive(Debug, Clone, Default)]
pub struct LeafSpec {
    /// Fail when absent and no default is declared.
    pub required: bool,
    /// Substituted when the value is absent.
    pub default: Option<DefaultValue>,
    /// Applied in order; each consumes the previous output.
    pub formatters: Vec<FormatterRef>,
    /// Applied in order against the formatted value; first failure wins.
    pub validators: Vec<ValidatorRef>,
}

impl LeafSpec {
    /// Create an optional leaf with no default and empty chains.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark this leaf required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declare a static default.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Static(value.into()));
        self
    }

    /// Declare a producer default, invoked at substitution time.
    #[must_use]
    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Producer(Arc::new(producer)));
        self
    }

    /// Append an inline formatter to the chain.
    #[must_use]
    pub fn format<F>(mut self, step: F) -> Self
    where
        F: Fn(Value, &StepContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.formatters.push(FormatterRef::Inline(Arc::new(step)));
        self
    }

    /// Append a named formatter reference, resolved per invocation.
    #[must_use]
    pub fn format_ref(mut self, name: impl Into<String>) -> Self {
        self.formatters.push(FormatterRef::Named(name.into()));
        self
    }

    /// Append an inline validator to the chain.
    #[must_use]
    pub fn validate<F>(mut self, step: F) -> Self
    where
        F: Fn(&Value, &StepContext<'_>) -> Result<(), Value> + Send + Sync + 'static,
    {
        self.validators.push(ValidatorRef::Inline(Arc::new(step)));
        self
    }

    /// Append a named validator reference, resolved per invocation.
    #[must_use]
    pub fn validate_ref(mut self, name: impl Into<String>) -> Self {
        self.validators.push(ValidatorRef::Named(name.into()));
        self
    }

    /// Append a pre-built validator callable.
    #[must_use]
    pub fn validate_with(mut self, step: Arc<ValidatorFn>) -> Self {
        self.validators.push(ValidatorRef::Inline(step));
        self
    }

    /// Append a pre-built formatter callable.
    #[must_use]
    pub fn format_with(mut self, step: Arc<FormatterFn>) -> Self {
        self.formatters.push(FormatterRef::Inline(step));
        self
    }
}

/// A schema specification: required flag and default for the container
/// itself, plus an ordered map of child specs.
#[derive(Debug, Clone, Default)]
pub struct SchemaSpec {
    /// Fail when the whole sub-object is absent and no default exists.
    pub required: bool,
    /// Substituted for the whole sub-object when absent.
    pub default: Option<DefaultValue>,
    /// Child specs, processed in declaration order.
    pub children: IndexMap<String, ParameterSpec>,
}

impl SchemaSpec {
    /// Create an optional schema with no children.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the container required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declare a static default for the whole sub-object.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Static(value.into()));
        self
    }

    /// Add a child spec. Declaration order is processing order.
    #[must_use]
    pub fn child(mut self, key: impl Into<String>, spec: impl Into<ParameterSpec>) -> Self {
        self.children.insert(key.into(), spec.into());
        self
    }
}
