use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One raw invocation as handed over by a transport: action name,
/// optional requested version, and the untouched caller input bag.
/// Created per call and consumed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    /// Name of the action to invoke.
    pub action_name: String,
    /// Explicit version; omitted means "latest registered".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_version: Option<u32>,
    /// Raw caller-supplied inputs, unvalidated.
    pub raw_params: Map<String, Value>,
}

impl RequestEnvelope {
    /// Assemble a request.
    #[must_use]
    pub fn new(
        action_name: impl Into<String>,
        raw_params: Map<String, Value>,
        requested_version: Option<u32>,
    ) -> Self {
        Self {
            action_name: action_name.into(),
            requested_version,
            raw_params,
        }
    }
}

/// Caller-facing echo data attached to every response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterInformation {
    /// Safelisted raw inputs, echoed back.
    pub received_params: Map<String, Value>,
    /// Version that was (or would have been) invoked, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// The structured result of one invocation.
///
/// Always well-formed: success and failure alike produce an envelope,
/// and it is destroyed after being returned to the caller. Serializes
/// with camelCase keys so transports can emit it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// Result fields written by the handler.
    pub response: Map<String, Value>,
    /// Failure, when any pipeline stage or the handler reported one.
    /// A plain message or an arbitrarily nested value, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// Echo data for the caller.
    pub requester_information: RequesterInformation,
}

impl ResponseEnvelope {
    /// Assemble an envelope from handler output.
    #[must_use]
    pub fn new(
        response: Map<String, Value>,
        error: Option<Value>,
        requester_information: RequesterInformation,
    ) -> Self {
        Self {
            response,
            error,
            requester_information,
        }
    }

    /// An envelope carrying only a failure.
    #[must_use]
    pub fn failure(error: Value, requester_information: RequesterInformation) -> Self {
        Self {
            response: Map::new(),
            error: Some(error),
            requester_information,
        }
    }

    /// Whether this invocation failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
