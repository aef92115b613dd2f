//! # Quasar Parameter Engine
//!
//! Declarative parameter schemas for the Quasar dispatch core: leaf and
//! recursively nested specs with defaults, formatter chains, validator
//! chains, and required/missing semantics, plus the immutability guard
//! applied to validated input trees.
//!
//! ## Core Types
//!
//! - [`ParameterSpec`] — leaf- or schema-shaped input specification
//! - [`MissingPolicy`] — the value set treated as "absent"
//! - [`StepRegistry`] — late-bound lookup table for named steps
//! - [`engine::normalize`] — the recursive validation walk
//! - [`GuardedParams`] — tamper-proof view handed to handler bodies
//! - [`ParameterError`] — the single failure a walk reports
//!
//! ## Quick Start
//!
//! ```rust
//! use quasar_parameter::prelude::*;
//! use serde_json::json;
//!
//! let inputs = [(
//!     "email".to_owned(),
//!     ParameterSpec::from(
//!         LeafSpec::new()
//!             .required()
//!             .format(|v, _| json!(v.as_str().unwrap_or_default().to_lowercase())),
//!     ),
//! )]
//! .into_iter()
//! .collect();
//!
//! let raw = json!({"email": "ADA@EXAMPLE.COM"}).as_object().unwrap().clone();
//! let tree = quasar_parameter::engine::normalize(
//!     "create_user",
//!     &inputs,
//!     &raw,
//!     &MissingPolicy::default(),
//!     &StepRegistry::new(),
//! )
//! .unwrap();
//! assert_eq!(tree["email"], json!("ada@example.com"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// The recursive schema engine over raw input bags.
pub mod engine;
/// Error type for parameter processing.
pub mod error;
/// Immutability guard over validated parameter trees.
pub mod guard;
/// Missing-value policy configuration.
pub mod policy;
/// Leaf and schema parameter specifications.
pub mod spec;
/// Validator/formatter chains and the shared step registry.
pub mod steps;

pub use error::ParameterError;
pub use guard::GuardedParams;
pub use policy::MissingPolicy;
pub use spec::{DefaultValue, LeafSpec, ParameterSpec, SchemaSpec};
pub use steps::{FormatterFn, FormatterRef, StepContext, StepRegistry, ValidatorFn, ValidatorRef};

/// Convenience re-exports for schema authors.
pub mod prelude {
    pub use crate::error::ParameterError;
    pub use crate::guard::GuardedParams;
    pub use crate::policy::MissingPolicy;
    pub use crate::spec::{DefaultValue, LeafSpec, ParameterSpec, SchemaSpec};
    pub use crate::steps::{FormatterRef, StepContext, StepRegistry, ValidatorRef};
}
