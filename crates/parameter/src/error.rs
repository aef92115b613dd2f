use serde_json::Value;

/// Error type for parameter processing.
///
/// Covers missing required values, validator failures, unresolvable
/// step references, and writes against the immutable parameter view.
/// The schema engine reports exactly one of these per invocation — the
/// first failure in declaration order.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    /// A required parameter was absent (or matched the missing-value
    /// policy) and no default was declared. `path` is the full dotted
    /// path to the offending leaf, e.g. `connection.host`.
    #[error("{path} is a required parameter for this action")]
    MissingRequired { path: String },

    /// A validator rejected the value at `path`. The failure payload is
    /// whatever the validator returned — a plain message or an
    /// arbitrarily structured value — and is surfaced verbatim.
    #[error("validation failed for `{path}`: {failure}")]
    Failed { path: String, failure: Value },

    /// A named validator reference did not resolve against the step
    /// registry at invocation time.
    #[error("validator `{name}` is not registered")]
    UnknownValidator { name: String },

    /// A named formatter reference did not resolve against the step
    /// registry at invocation time.
    #[error("formatter `{name}` is not registered")]
    UnknownFormatter { name: String },

    /// Handler code attempted to write into the guarded parameter tree.
    #[error("cannot modify immutable parameter `{key}`")]
    ImmutableMutation { key: String },
}

impl ParameterError {
    /// Create a missing-required error for the given dotted path.
    pub fn missing_required(path: impl Into<String>) -> Self {
        Self::MissingRequired { path: path.into() }
    }

    /// Create a validator-failure error carrying the verbatim payload.
    pub fn failed(path: impl Into<String>, failure: Value) -> Self {
        Self::Failed {
            path: path.into(),
            failure,
        }
    }

    /// Create an immutable-mutation error naming the attempted key.
    pub fn immutable_mutation(key: impl Into<String>) -> Self {
        Self::ImmutableMutation { key: key.into() }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::MissingRequired { .. } => "missing",
            Self::Failed { .. } => "validation",
            Self::UnknownValidator { .. } | Self::UnknownFormatter { .. } => "lookup",
            Self::ImmutableMutation { .. } => "immutability",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingRequired { .. } => "PARAM_MISSING_REQUIRED",
            Self::Failed { .. } => "PARAM_VALIDATION",
            Self::UnknownValidator { .. } => "PARAM_UNKNOWN_VALIDATOR",
            Self::UnknownFormatter { .. } => "PARAM_UNKNOWN_FORMATTER",
            Self::ImmutableMutation { .. } => "PARAM_IMMUTABLE",
        }
    }

    /// Collapse this error into the value that belongs in a response
    /// envelope's `error` field.
    ///
    /// Validator failures pass their payload through unchanged — a
    /// structured failure object survives intact. Every other variant
    /// becomes its display message.
    #[must_use]
    pub fn into_error_value(self) -> Value {
        match self {
            Self::Failed { failure, .. } => failure,
            other => Value::String(other.to_string()),
        }
    }
}
