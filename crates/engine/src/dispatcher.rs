//! The dispatcher — sequences resolution, validation, guarding, and
//! handler execution into one response envelope.
//!
//! An invocation walks `received → resolved → validated → guarded →
//! executed → responded`, with `failed` reachable from resolution,
//! validation, or the handler itself. Whatever happens, `dispatch`
//! returns a well-formed envelope; no invocation-time fault propagates
//! to the transport.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use quasar_action::{ActionDefinition, ActionRegistry, ActionResponse, RegistrationError};
use quasar_parameter::{GuardedParams, MissingPolicy, StepRegistry, engine};

use crate::envelope::{RequestEnvelope, RequesterInformation, ResponseEnvelope};
use crate::error::EngineError;
use crate::resolver;

/// Pipeline stage of one in-flight invocation, used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Raw request accepted.
    Received,
    /// A concrete definition was selected.
    Resolved,
    /// The input tree validated and normalized.
    Validated,
    /// The normalized tree was wrapped read-only.
    Guarded,
    /// The handler body ran to completion.
    Executed,
    /// The envelope is assembled.
    Responded,
    /// A stage or the handler reported a failure.
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Resolved => "resolved",
            Self::Validated => "validated",
            Self::Guarded => "guarded",
            Self::Executed => "executed",
            Self::Responded => "responded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Builder for a [`Dispatcher`] with a non-default configuration.
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    policy: MissingPolicy,
    steps: StepRegistry,
}

impl DispatcherBuilder {
    /// Use a custom missing-value policy.
    #[must_use]
    pub fn missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Seed the named validator/formatter registry.
    #[must_use]
    pub fn steps(mut self, steps: StepRegistry) -> Self {
        self.steps = steps;
        self
    }

    /// Finish the build.
    #[must_use]
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            registry: ActionRegistry::new(),
            policy: self.policy,
            steps: self.steps,
        }
    }
}

/// Owns the action registry and configuration, and turns raw requests
/// into response envelopes.
///
/// Registration and step/policy mutation take `&mut self` and belong to
/// setup/teardown windows; steady-state invocations share the
/// dispatcher immutably. Each invocation carries private state only, so
/// no locking is involved anywhere.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: ActionRegistry,
    policy: MissingPolicy,
    steps: StepRegistry,
}

impl Dispatcher {
    /// A dispatcher with the default missing-value policy and an empty
    /// step registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder for custom configuration.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Register one action version. See [`ActionRegistry::register`].
    pub fn register(&mut self, definition: ActionDefinition) -> Result<(), RegistrationError> {
        self.registry.register(definition)
    }

    /// The underlying registry, for introspection.
    #[must_use]
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Mutable access to the named step registry. Entries may be
    /// registered or replaced between invocations; they resolve at
    /// invocation time.
    pub fn steps_mut(&mut self) -> &mut StepRegistry {
        &mut self.steps
    }

    /// The active missing-value policy.
    #[must_use]
    pub fn missing_policy(&self) -> &MissingPolicy {
        &self.policy
    }

    /// Invoke an action by name with a raw input bag.
    pub async fn invoke(
        &self,
        name: &str,
        raw_params: Map<String, Value>,
        requested_version: Option<u32>,
    ) -> ResponseEnvelope {
        self.dispatch(RequestEnvelope::new(name, raw_params, requested_version))
            .await
    }

    /// Process one request envelope to completion.
    ///
    /// Always returns a well-formed envelope; resolution failures,
    /// validation failures, handler faults, and handler panics all land
    /// in its `error` field.
    pub async fn dispatch(&self, request: RequestEnvelope) -> ResponseEnvelope {
        let RequestEnvelope {
            action_name,
            requested_version,
            raw_params,
        } = request;
        trace_stage(&action_name, Stage::Received);

        let definition = match resolver::resolve(&self.registry, &action_name, requested_version)
        {
            Ok(definition) => Arc::clone(definition),
            Err(err) => {
                return fail(
                    &action_name,
                    err,
                    self.received_params(&raw_params, None),
                    requested_version,
                );
            }
        };
        trace_stage(&action_name, Stage::Resolved);

        let normalized = match engine::normalize(
            &definition.name,
            &definition.inputs,
            &raw_params,
            &self.policy,
            &self.steps,
        ) {
            Ok(tree) => tree,
            Err(err) => {
                return fail(
                    &action_name,
                    err.into(),
                    self.received_params(&raw_params, None),
                    Some(definition.version),
                );
            }
        };
        trace_stage(&action_name, Stage::Validated);

        let received_params = self.received_params(&raw_params, Some(&normalized));
        let requester_information = RequesterInformation {
            received_params,
            version: Some(definition.version),
        };

        let guarded = GuardedParams::new(normalized);
        trace_stage(&action_name, Stage::Guarded);

        // The handler runs in its own task so a panic surfaces as a
        // JoinError instead of tearing down the dispatcher.
        let handler = Arc::clone(&definition.handler);
        let task = tokio::spawn(async move {
            let mut response = ActionResponse::new();
            let outcome = handler.run(&guarded, &mut response).await;
            (response, outcome)
        });

        let envelope = match task.await {
            Ok((response, Ok(()))) => {
                trace_stage(&action_name, Stage::Executed);
                let (data, error) = response.into_parts();
                ResponseEnvelope::new(data, error, requester_information)
            }
            Ok((response, Err(fault))) => {
                tracing::debug!(
                    action = %action_name,
                    stage = %Stage::Failed,
                    fault = %fault,
                    "handler fault"
                );
                let (data, _) = response.into_parts();
                ResponseEnvelope::new(
                    data,
                    Some(EngineError::from(fault).into_error_value()),
                    requester_information,
                )
            }
            Err(join_err) => {
                tracing::error!(action = %action_name, ?join_err, "handler task panicked");
                let err = EngineError::HandlerPanic {
                    reason: join_err.to_string(),
                };
                ResponseEnvelope::failure(err.into_error_value(), requester_information)
            }
        };

        trace_stage(&action_name, Stage::Responded);
        envelope
    }

    /// Echo filter: keep only safelisted top-level raw inputs. Declared
    /// inputs echo their normalized value once validation produced one;
    /// framework-owned names echo verbatim.
    fn received_params(
        &self,
        raw: &Map<String, Value>,
        normalized: Option<&Map<String, Value>>,
    ) -> Map<String, Value> {
        raw.iter()
            .filter(|(key, _)| self.registry.is_safelisted(key))
            .map(|(key, value)| {
                let echoed = normalized
                    .and_then(|tree| tree.get(key))
                    .unwrap_or(value)
                    .clone();
                (key.clone(), echoed)
            })
            .collect()
    }
}

fn fail(
    action: &str,
    err: EngineError,
    received_params: Map<String, Value>,
    version: Option<u32>,
) -> ResponseEnvelope {
    tracing::debug!(
        action = %action,
        stage = %Stage::Failed,
        category = err.category(),
        error = %err,
        "invocation failed"
    );
    ResponseEnvelope::failure(
        err.into_error_value(),
        RequesterInformation {
            received_params,
            version,
        },
    )
}

fn trace_stage(action: &str, stage: Stage) {
    tracing::debug!(action = %action, stage = %stage, "dispatch stage");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quasar_action::handler_fn;
    use quasar_parameter::LeafSpec;
    use serde_json::json;

    fn bag(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn echo_dispatcher() -> Dispatcher {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(
                ActionDefinition::new(
                    "echo",
                    handler_fn(|params, response| {
                        response.set("params", params.to_value());
                        Ok(())
                    }),
                )
                .with_input("word", LeafSpec::new().required()),
            )
            .unwrap();
        dispatcher
    }

    #[tokio::test]
    async fn successful_invocation() {
        let dispatcher = echo_dispatcher();
        let envelope = dispatcher
            .invoke("echo", bag(json!({"word": "hi"})), None)
            .await;

        assert!(!envelope.is_error());
        assert_eq!(envelope.response["params"], json!({"word": "hi"}));
        assert_eq!(envelope.requester_information.version, Some(1));
    }

    #[tokio::test]
    async fn unknown_action_fails_with_combined_message() {
        let dispatcher = echo_dispatcher();
        let envelope = dispatcher.invoke("nope", Map::new(), None).await;
        assert_eq!(
            envelope.error,
            Some(json!("unknown action or invalid apiVersion"))
        );
        assert_eq!(envelope.requester_information.version, None);
    }

    #[tokio::test]
    async fn validation_failure_reports_version() {
        let dispatcher = echo_dispatcher();
        let envelope = dispatcher.invoke("echo", Map::new(), None).await;
        assert_eq!(
            envelope.error,
            Some(json!("word is a required parameter for this action"))
        );
        assert_eq!(envelope.requester_information.version, Some(1));
        assert!(envelope.response.is_empty());
    }

    #[tokio::test]
    async fn handler_fault_becomes_string_error() {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(ActionDefinition::new(
                "broken",
                handler_fn(|_, _| Err("wires crossed".into())),
            ))
            .unwrap();

        let envelope = dispatcher.invoke("broken", Map::new(), None).await;
        assert_eq!(envelope.error, Some(json!("wires crossed")));
    }

    #[tokio::test]
    async fn handler_panic_is_recovered() {
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(ActionDefinition::new(
                "explosive",
                handler_fn(|_, _| panic!("kaboom")),
            ))
            .unwrap();

        let envelope = dispatcher.invoke("explosive", Map::new(), None).await;
        let message = envelope.error.unwrap();
        assert!(
            message.as_str().unwrap().contains("panicked"),
            "got: {message}"
        );
    }

    #[tokio::test]
    async fn non_safelisted_inputs_are_not_echoed() {
        let dispatcher = echo_dispatcher();
        let envelope = dispatcher
            .invoke("echo", bag(json!({"word": "hi", "sneaky": 1})), None)
            .await;

        let received = &envelope.requester_information.received_params;
        assert!(received.contains_key("word"));
        assert!(!received.contains_key("sneaky"));
    }

    #[tokio::test]
    async fn reserved_names_echo_verbatim() {
        let dispatcher = echo_dispatcher();
        let envelope = dispatcher
            .invoke(
                "echo",
                bag(json!({"word": "hi", "apiVersion": "1", "callback": "cb"})),
                None,
            )
            .await;

        let received = &envelope.requester_information.received_params;
        assert_eq!(received["apiVersion"], json!("1"));
        assert_eq!(received["callback"], json!("cb"));
    }

    #[tokio::test]
    async fn builder_applies_custom_policy() {
        let mut dispatcher = Dispatcher::builder()
            .missing_policy(MissingPolicy::empty())
            .build();
        dispatcher
            .register(
                ActionDefinition::new(
                    "strict",
                    handler_fn(|params, response| {
                        response.set("got", params.get("value").cloned().unwrap_or(Value::Null));
                        Ok(())
                    }),
                )
                .with_input("value", LeafSpec::new().required()),
            )
            .unwrap();

        // Empty string is a real value under the empty policy.
        let envelope = dispatcher
            .invoke("strict", bag(json!({"value": ""})), None)
            .await;
        assert!(!envelope.is_error());
        assert_eq!(envelope.response["got"], json!(""));
    }

    #[test]
    fn stage_display_names() {
        let stages = [
            (Stage::Received, "received"),
            (Stage::Resolved, "resolved"),
            (Stage::Validated, "validated"),
            (Stage::Guarded, "guarded"),
            (Stage::Executed, "executed"),
            (Stage::Responded, "responded"),
            (Stage::Failed, "failed"),
        ];
        for (stage, expected) in stages {
            assert_eq!(stage.to_string(), expected);
        }
    }
}
