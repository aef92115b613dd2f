use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ParameterError;

/// Tamper-proof view over a validated parameter tree.
///
/// Applied once, after validation succeeds and before the handler body
/// runs. Reads are unrestricted; the write surface is a fallible
/// [`set`](Self::set) that always refuses, naming the attempted key —
/// ownership already forbids direct mutation, and the explicit method
/// covers dynamic by-name writers so the refusal is observable rather
/// than silent.
///
/// # Example
///
/// ```rust
/// use quasar_parameter::guard::GuardedParams;
/// use serde_json::json;
///
/// let params = GuardedParams::new(
///     json!({"user": {"name": "ada"}}).as_object().unwrap().clone(),
/// );
/// assert_eq!(params.lookup("user.name"), Some(&json!("ada")));
/// assert!(params.set("user", json!("other")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct GuardedParams {
    tree: Map<String, Value>,
}

impl GuardedParams {
    /// Wrap a normalized parameter tree.
    #[must_use]
    pub fn new(tree: Map<String, Value>) -> Self {
        Self { tree }
    }

    /// Read a top-level parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.tree.get(key)
    }

    /// Read a nested parameter by dotted path, e.g. `connection.host`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = self.tree.get(path.split('.').next()?)?;
        for segment in path.split('.').skip(1) {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Read a top-level parameter as a string slice.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Read a top-level parameter as a signed integer.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Read a top-level parameter as a boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Whether a top-level parameter is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.tree.contains_key(key)
    }

    /// Number of top-level parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the tree holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Iterate over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.tree.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Borrow the underlying tree.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.tree
    }

    /// Clone the tree into a plain JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.tree.clone())
    }

    /// Attempt to assign into the guarded tree. Always fails with an
    /// immutable-mutation error naming `key`; the supplied value is
    /// discarded.
    pub fn set(&self, key: &str, _value: Value) -> Result<(), ParameterError> {
        Err(ParameterError::immutable_mutation(key))
    }

    /// Attempt to remove a key from the guarded tree. Always fails with
    /// an immutable-mutation error naming `key`.
    pub fn remove(&self, key: &str) -> Result<(), ParameterError> {
        Err(ParameterError::immutable_mutation(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn params(value: Value) -> GuardedParams {
        GuardedParams::new(value.as_object().unwrap().clone())
    }

    #[test]
    fn reads_are_unaffected() {
        let p = params(json!({"name": "ada", "limit": 5, "flag": true}));
        assert_eq!(p.get_str("name"), Some("ada"));
        assert_eq!(p.get_i64("limit"), Some(5));
        assert_eq!(p.get_bool("flag"), Some(true));
        assert_eq!(p.len(), 3);
        assert!(p.contains("name"));
        assert!(!p.is_empty());
    }

    #[test]
    fn lookup_walks_dotted_paths() {
        let p = params(json!({"a": {"b": {"c": 7}}}));
        assert_eq!(p.lookup("a.b.c"), Some(&json!(7)));
        assert_eq!(p.lookup("a.b"), Some(&json!({"c": 7})));
        assert_eq!(p.lookup("a.missing"), None);
        assert_eq!(p.lookup("missing"), None);
    }

    #[test]
    fn lookup_stops_at_non_objects() {
        let p = params(json!({"a": 1}));
        assert_eq!(p.lookup("a.b"), None);
    }

    #[test]
    fn set_always_fails_naming_the_key() {
        let p = params(json!({"name": "ada"}));
        let err = p.set("name", json!("grace")).unwrap_err();
        assert_eq!(err.to_string(), "cannot modify immutable parameter `name`");

        // Unknown keys are refused the same way — no write path exists.
        let err = p.set("brand_new", json!(1)).unwrap_err();
        assert!(err.to_string().contains("brand_new"));

        // The tree is untouched.
        assert_eq!(p.get_str("name"), Some("ada"));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn remove_always_fails() {
        let p = params(json!({"name": "ada"}));
        assert!(p.remove("name").is_err());
        assert!(p.contains("name"));
    }

    #[test]
    fn iter_yields_all_pairs() {
        let p = params(json!({"a": 1, "b": 2}));
        let mut keys: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn serializes_transparently() {
        let p = params(json!({"a": 1}));
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({"a": 1}));
    }
}
