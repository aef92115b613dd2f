//! Version resolution — picks the concrete definition to invoke.

use std::sync::Arc;

use quasar_action::{ActionDefinition, ActionRegistry};

use crate::error::EngineError;

/// Resolve `(name, requested_version)` to a definition.
///
/// An omitted version selects the latest registered one. An unknown
/// name and an unregistered version produce the same combined error —
/// callers cannot tell the two apart. An action registered without an
/// explicit version resolves to version 1, without the caller ever
/// needing to know that number.
pub fn resolve<'a>(
    registry: &'a ActionRegistry,
    name: &str,
    requested_version: Option<u32>,
) -> Result<&'a Arc<ActionDefinition>, EngineError> {
    let versions = registry
        .versions_of(name)
        .ok_or(EngineError::UnknownActionOrVersion)?;

    match requested_version {
        None => versions.latest().ok_or(EngineError::UnknownActionOrVersion),
        Some(version) => versions
            .get(version)
            .ok_or(EngineError::UnknownActionOrVersion),
    }
}
