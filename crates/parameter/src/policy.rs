use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The set of values treated as "absent" for required-checking and
/// default-substitution purposes.
///
/// A raw input counts as missing if its key is not present at all, or if
/// its value equals any element of this policy. The default policy
/// treats `null` and the empty string as missing; `false` and empty
/// collections are never missing under it.
///
/// The policy is plain data and is threaded into the schema engine per
/// invocation, so concurrent invocations under different policies cannot
/// race on shared configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingPolicy {
    absent: Vec<Value>,
}

impl Default for MissingPolicy {
    fn default() -> Self {
        Self {
            absent: vec![Value::Null, Value::String(String::new())],
        }
    }
}

impl MissingPolicy {
    /// A policy that treats no present value as missing — only truly
    /// absent keys count.
    #[must_use]
    pub fn empty() -> Self {
        Self { absent: Vec::new() }
    }

    /// Build a policy from an explicit value set, in order.
    #[must_use]
    pub fn new(absent: Vec<Value>) -> Self {
        Self { absent }
    }

    /// Add a value to the missing set.
    #[must_use]
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !self.absent.contains(&value) {
            self.absent.push(value);
        }
        self
    }

    /// Remove a value from the missing set.
    #[must_use]
    pub fn without(mut self, value: &Value) -> Self {
        self.absent.retain(|v| v != value);
        self
    }

    /// Whether a present value counts as missing under this policy.
    #[must_use]
    pub fn treats_as_missing(&self, value: &Value) -> bool {
        self.absent.contains(value)
    }

    /// The configured missing-value set, in order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.absent
    }
}
