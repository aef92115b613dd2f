use quasar_parameter::ParameterError;

/// Error type for action registration.
///
/// Fatal only to the registration call that produced it — other
/// registered actions are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The definition has no name.
    #[error("action definition is missing a name")]
    MissingName,

    /// A top-level input collides with a framework-owned name.
    #[error("action `{action}` declares reserved input `{input}`")]
    ReservedParam { action: String, input: String },

    /// Versions are positive integers.
    #[error("action `{action}` declares invalid version {version}")]
    InvalidVersion { action: String, version: u32 },
}

impl RegistrationError {
    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::MissingName => "ACTION_MISSING_NAME",
            Self::ReservedParam { .. } => "ACTION_RESERVED_PARAM",
            Self::InvalidVersion { .. } => "ACTION_INVALID_VERSION",
        }
    }
}

/// A fault raised by a handler body.
///
/// Uncaught handler failures are converted to their string description
/// by the dispatcher; a handler that wants a structured error writes it
/// into the response container instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerFault {
    message: String,
}

impl HandlerFault {
    /// Create a fault from a description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The fault description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ParameterError> for HandlerFault {
    fn from(err: ParameterError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<String> for HandlerFault {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerFault {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
