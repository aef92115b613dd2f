use serde_json::{Map, Value};

/// The mutable container a handler body writes its result into.
///
/// Unlike the guarded parameter tree, this stays freely mutable for the
/// whole handler run. A handler populates `data` key by key, and may
/// set `error` to any value — a message or an arbitrarily nested
/// object — which the dispatcher passes through to the envelope
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionResponse {
    data: Map<String, Value>,
    error: Option<Value>,
}

impl ActionResponse {
    /// Create an empty response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one result field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Read back a result field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Record a failure. Accepts any value; nested objects survive
    /// verbatim into the envelope.
    pub fn fail(&mut self, error: impl Into<Value>) -> &mut Self {
        self.error = Some(error.into());
        self
    }

    /// The recorded failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Value> {
        self.error.as_ref()
    }

    /// The result fields written so far.
    #[must_use]
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Number of result fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no result fields were written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Split into result fields and failure for envelope assembly.
    #[must_use]
    pub fn into_parts(self) -> (Map<String, Value>, Option<Value>) {
        (self.data, self.error)
    }
}
