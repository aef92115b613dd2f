//! Validator/formatter chains and the shared step registry.
//!
//! A leaf spec carries ordered chains of validation and formatting
//! steps. Each entry is either an inline callable or a named reference
//! into a [`StepRegistry`] populated by the host — the registry is the
//! explicit lookup root for logic that lives outside the action
//! definition. Named references resolve at invocation time, so entries
//! may be registered or replaced between invocations.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ParameterError;

/// Context handed to every validator and formatter call.
///
/// Steps receive this explicitly instead of reading identifiers off an
/// ambient environment, so failures can name the action and parameter
/// they belong to.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Name of the action being invoked.
    pub action: &'a str,
    /// Full dotted path of the parameter under this chain.
    pub path: &'a str,
}

/// One validation step.
///
/// Passes by returning `Ok(())`; fails by returning `Err` with the
/// failure payload — a plain message or a structured value — which the
/// engine surfaces verbatim.
pub type ValidatorFn = dyn Fn(&Value, &StepContext<'_>) -> Result<(), Value> + Send + Sync;

/// One formatting step. Consumes the current value and produces the
/// value handed to the next step in the chain.
pub type FormatterFn = dyn Fn(Value, &StepContext<'_>) -> Value + Send + Sync;

/// A validator chain entry: an inline callable or a named reference
/// resolved against the [`StepRegistry`] per invocation.
#[derive(Clone)]
pub enum ValidatorRef {
    /// Directly supplied callable.
    Inline(Arc<ValidatorFn>),
    /// Reference into the step registry, e.g. `users.check_email`.
    Named(String),
}

/// A formatter chain entry: an inline callable or a named reference.
#[derive(Clone)]
pub enum FormatterRef {
    /// Directly supplied callable.
    Inline(Arc<FormatterFn>),
    /// Reference into the step registry.
    Named(String),
}

impl fmt::Debug for ValidatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(..)"),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl fmt::Debug for FormatterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("Inline(..)"),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

/// Shared lookup table for named validators and formatters.
///
/// Populated by the host during setup; read during invocation. Entries
/// may be replaced between invocations — resolution is late-bound.
#[derive(Default, Clone)]
pub struct StepRegistry {
    validators: HashMap<String, Arc<ValidatorFn>>,
    formatters: HashMap<String, Arc<FormatterFn>>,
}

impl StepRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a named validator.
    pub fn validator<F>(&mut self, name: impl Into<String>, step: F) -> &mut Self
    where
        F: Fn(&Value, &StepContext<'_>) -> Result<(), Value> + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(step));
        self
    }

    /// Register (or replace) a named formatter.
    pub fn formatter<F>(&mut self, name: impl Into<String>, step: F) -> &mut Self
    where
        F: Fn(Value, &StepContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.formatters.insert(name.into(), Arc::new(step));
        self
    }

    /// Resolve a named validator, if registered.
    #[must_use]
    pub fn resolve_validator(&self, name: &str) -> Option<&Arc<ValidatorFn>> {
        self.validators.get(name)
    }

    /// Resolve a named formatter, if registered.
    #[must_use]
    pub fn resolve_formatter(&self, name: &str) -> Option<&Arc<FormatterFn>> {
        self.formatters.get(name)
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("formatters", &self.formatters.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Run a formatter chain in declared order, piping each result into the
/// next step. The final value replaces the raw one.
pub fn run_formatters(
    chain: &[FormatterRef],
    mut value: Value,
    registry: &StepRegistry,
    ctx: &StepContext<'_>,
) -> Result<Value, ParameterError> {
    for step in chain {
        value = match step {
            FormatterRef::Inline(f) => f(value, ctx),
            FormatterRef::Named(name) => {
                let f = registry.resolve_formatter(name).ok_or_else(|| {
                    ParameterError::UnknownFormatter { name: name.clone() }
                })?;
                f(value, ctx)
            }
        };
    }
    Ok(value)
}

/// Run a validator chain in declared order against one value.
///
/// The first failing validator short-circuits the rest of the chain;
/// its payload becomes the failure reported for `ctx.path`.
pub fn run_validators(
    chain: &[ValidatorRef],
    value: &Value,
    registry: &StepRegistry,
    ctx: &StepContext<'_>,
) -> Result<(), ParameterError> {
    for step in chain {
        let outcome = match step {
            ValidatorRef::Inline(f) => f(value, ctx),
            ValidatorRef::Named(name) => {
                let f = registry.resolve_validator(name).ok_or_else(|| {
                    ParameterError::UnknownValidator { name: name.clone() }
                })?;
                f(value, ctx)
            }
        };
        if let Err(failure) = outcome {
            return Err(ParameterError::failed(ctx.path, failure));
        }
    }
    Ok(())
}
