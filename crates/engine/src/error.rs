use quasar_action::HandlerFault;
use quasar_parameter::ParameterError;
use serde_json::Value;

/// Invocation-time failures the dispatcher recovers into the envelope.
///
/// None of these ever propagate out of an invocation; every variant
/// collapses into the `error` field of a well-formed response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// No definition matched the requested name and version. A missing
    /// action and a missing version are deliberately indistinguishable
    /// to the caller.
    #[error("unknown action or invalid apiVersion")]
    UnknownActionOrVersion,

    /// Validation or guard failure from the parameter engine.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Uncaught failure from the handler body.
    #[error("{0}")]
    Handler(HandlerFault),

    /// The handler task died before settling (e.g. a panic).
    #[error("handler panicked: {reason}")]
    HandlerPanic { reason: String },
}

impl EngineError {
    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::UnknownActionOrVersion => "resolution",
            Self::Parameter(err) => err.category(),
            Self::Handler(_) | Self::HandlerPanic { .. } => "handler",
        }
    }

    /// Collapse into the value that belongs in the envelope's `error`
    /// field. Structured validator failures pass through verbatim;
    /// everything else becomes its display message.
    #[must_use]
    pub fn into_error_value(self) -> Value {
        match self {
            Self::Parameter(err) => err.into_error_value(),
            other => Value::String(other.to_string()),
        }
    }
}

impl From<HandlerFault> for EngineError {
    fn from(fault: HandlerFault) -> Self {
        Self::Handler(fault)
    }
}
