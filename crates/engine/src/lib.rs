//! # Quasar Engine
//!
//! The dispatch core of the Quasar action framework: version
//! resolution, parameter validation, input guarding, and handler
//! execution, sequenced into a single invocation that always produces a
//! well-formed [`ResponseEnvelope`].
//!
//! Transports hand a [`RequestEnvelope`] (or just name + raw params) to
//! [`Dispatcher::dispatch`]; whatever happens inside — unknown action,
//! validation failure, handler fault, handler panic — the caller gets
//! an envelope back, never an error.
//!
//! ## Quick Start
//!
//! ```rust
//! use quasar_engine::prelude::*;
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .register(
//!         ActionDefinition::new(
//!             "greet",
//!             handler_fn(|params, response| {
//!                 let name = params.get_str("name").unwrap_or("world");
//!                 response.set("greeting", format!("hello {name}"));
//!                 Ok(())
//!             }),
//!         )
//!         .with_input("name", LeafSpec::new().default_value(json!("world"))),
//!     )
//!     .unwrap();
//!
//! let envelope = dispatcher
//!     .invoke("greet", json!({"name": "ada"}).as_object().unwrap().clone(), None)
//!     .await;
//! assert_eq!(envelope.response["greeting"], json!("hello ada"));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// The dispatcher state machine.
pub mod dispatcher;
/// Request and response envelopes.
pub mod envelope;
/// Invocation-time error taxonomy.
pub mod error;
/// Version resolution.
pub mod resolver;

pub use dispatcher::{Dispatcher, DispatcherBuilder, Stage};
pub use envelope::{RequestEnvelope, RequesterInformation, ResponseEnvelope};
pub use error::EngineError;
pub use resolver::resolve;

/// Convenience re-exports for hosts embedding the dispatch core.
pub mod prelude {
    pub use crate::dispatcher::{Dispatcher, DispatcherBuilder, Stage};
    pub use crate::envelope::{RequestEnvelope, RequesterInformation, ResponseEnvelope};
    pub use crate::error::EngineError;

    pub use quasar_action::{
        ActionDefinition, ActionRegistry, ActionResponse, Handler, HandlerFault,
        RegistrationError, handler_fn,
    };
    pub use quasar_parameter::{
        GuardedParams, LeafSpec, MissingPolicy, ParameterSpec, SchemaSpec, StepContext,
        StepRegistry,
    };
}
