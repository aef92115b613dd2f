//! # Quasar Action System
//!
//! Action definitions and the versioned registry for the Quasar
//! dispatch core. This crate defines **what** actions are and how their
//! handlers communicate with the dispatcher; orchestration lives in
//! `quasar-engine`.
//!
//! ## Core Types
//!
//! - [`ActionDefinition`] — one version of one action (schema, handler,
//!   metadata)
//! - [`Handler`] — the async run-body contract; [`handler_fn`] adapts a
//!   plain closure
//! - [`ActionResponse`] — the mutable container handlers write into
//! - [`ActionRegistry`] — name → ordered version set, plus the safelist
//!   of echoable input names
//! - [`RegistrationError`] / [`HandlerFault`] — registration- and
//!   run-time failures
//!
//! ## Quick Start
//!
//! ```rust
//! use quasar_action::prelude::*;
//! use quasar_parameter::LeafSpec;
//!
//! let mut registry = ActionRegistry::new();
//! registry
//!     .register(
//!         ActionDefinition::new(
//!             "greet",
//!             handler_fn(|params, response| {
//!                 let name = params.get_str("name").unwrap_or("world");
//!                 response.set("greeting", format!("hello {name}"));
//!                 Ok(())
//!             }),
//!         )
//!         .with_input("name", LeafSpec::new()),
//!     )
//!     .unwrap();
//!
//! assert!(registry.lookup("greet", 1).is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// One version of one action: schema, handler, metadata.
pub mod definition;
/// Registration-time errors and handler faults.
pub mod error;
/// The async handler contract and closure adapter.
pub mod handler;
/// Reserved, framework-owned parameter names.
pub mod keys;
/// Name → version-set registry and the echo safelist.
pub mod registry;
/// The mutable response container handlers write into.
pub mod response;

pub use definition::ActionDefinition;
pub use error::{HandlerFault, RegistrationError};
pub use handler::{Handler, handler_fn};
pub use keys::{RESERVED_PARAM_NAMES, is_reserved};
pub use registry::{ActionRegistry, ActionVersionSet};
pub use response::ActionResponse;

/// Convenience re-exports for action authors.
pub mod prelude {
    pub use crate::definition::ActionDefinition;
    pub use crate::error::{HandlerFault, RegistrationError};
    pub use crate::handler::{Handler, handler_fn};
    pub use crate::registry::{ActionRegistry, ActionVersionSet};
    pub use crate::response::ActionResponse;

    // Schema types action authors need when declaring inputs.
    pub use quasar_parameter::{GuardedParams, LeafSpec, ParameterSpec, SchemaSpec};
}
