use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::definition::ActionDefinition;
use crate::error::RegistrationError;
use crate::keys;

/// The versions registered under one action name.
///
/// Ordered by version number; the latest is the maximum present,
/// recomputed as versions are added.
#[derive(Default, Clone)]
pub struct ActionVersionSet {
    versions: BTreeMap<u32, Arc<ActionDefinition>>,
}

impl ActionVersionSet {
    fn insert(&mut self, definition: Arc<ActionDefinition>) {
        self.versions.insert(definition.version, definition);
    }

    /// The definition for an exact version, if registered.
    #[must_use]
    pub fn get(&self, version: u32) -> Option<&Arc<ActionDefinition>> {
        self.versions.get(&version)
    }

    /// The definition with the highest version number.
    #[must_use]
    pub fn latest(&self) -> Option<&Arc<ActionDefinition>> {
        self.versions.values().next_back()
    }

    /// The highest registered version number.
    #[must_use]
    pub fn latest_version(&self) -> Option<u32> {
        self.versions.keys().next_back().copied()
    }

    /// Registered version numbers, ascending.
    pub fn versions(&self) -> impl Iterator<Item = u32> + '_ {
        self.versions.keys().copied()
    }

    /// Number of registered versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns `true` if no versions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl fmt::Debug for ActionVersionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionVersionSet")
            .field("versions", &self.versions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registry of all action definitions, keyed by name and version.
///
/// Owns every definition for the process lifetime. Registration takes
/// `&mut self` — mutation belongs to setup/teardown windows, and
/// steady-state request handling observes the registry immutably, so no
/// locking is needed anywhere.
///
/// The registry also maintains the safelist: the set of top-level raw
/// input names echoed back to callers, built from the union of every
/// registered action's input names plus the framework-reserved names.
pub struct ActionRegistry {
    actions: HashMap<String, ActionVersionSet>,
    safelist: HashSet<String>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    /// Create an empty registry. The safelist starts with the
    /// framework-reserved names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            safelist: keys::RESERVED_PARAM_NAMES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }

    /// Register one action version.
    ///
    /// Fails if the name is empty, the version is 0, or a top-level
    /// input collides with a reserved name. A failed registration
    /// leaves the registry untouched. Registering an existing
    /// `(name, version)` pair replaces the previous definition.
    pub fn register(&mut self, definition: ActionDefinition) -> Result<(), RegistrationError> {
        if definition.name.is_empty() {
            return Err(RegistrationError::MissingName);
        }
        if definition.version == 0 {
            return Err(RegistrationError::InvalidVersion {
                action: definition.name,
                version: 0,
            });
        }
        if let Some(input) = definition.inputs.keys().find(|k| keys::is_reserved(k)) {
            return Err(RegistrationError::ReservedParam {
                input: input.clone(),
                action: definition.name,
            });
        }

        self.safelist.extend(definition.inputs.keys().cloned());
        tracing::debug!(
            action = %definition.name,
            version = definition.version,
            inputs = definition.inputs.len(),
            "registered action"
        );
        self.actions
            .entry(definition.name.clone())
            .or_default()
            .insert(Arc::new(definition));
        Ok(())
    }

    /// Look up one exact `(name, version)` definition.
    #[must_use]
    pub fn lookup(&self, name: &str, version: u32) -> Option<&Arc<ActionDefinition>> {
        self.actions.get(name)?.get(version)
    }

    /// All versions registered under `name`.
    #[must_use]
    pub fn versions_of(&self, name: &str) -> Option<&ActionVersionSet> {
        self.actions.get(name)
    }

    /// Whether any version of `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Whether a raw top-level input name is echoed back to callers.
    #[must_use]
    pub fn is_safelisted(&self, name: &str) -> bool {
        self.safelist.contains(name)
    }

    /// Number of registered action names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over `(name, version set)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionVersionSet)> {
        self.actions.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("count", &self.actions.len())
            .field("names", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
