use std::sync::Arc;

use async_trait::async_trait;
use quasar_parameter::GuardedParams;

use crate::error::HandlerFault;
use crate::response::ActionResponse;

/// The run body of one action version.
///
/// Receives the guarded (read-only) parameter tree and the mutable
/// response container. A handler may suspend; the dispatcher awaits
/// exactly one invocation per request. The return value on success is
/// ignored — results belong in `response`. Returning `Err` (or
/// panicking) fails the invocation with the fault's description.
///
/// # Object Safety
///
/// Object-safe; the registry stores handlers as `Arc<dyn Handler>`.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Execute against validated params, writing into `response`.
    async fn run(
        &self,
        params: &GuardedParams,
        response: &mut ActionResponse,
    ) -> Result<(), HandlerFault>;
}

/// Adapter wrapping a synchronous closure as a [`Handler`].
struct FnHandler<F>(F);

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&GuardedParams, &mut ActionResponse) -> Result<(), HandlerFault>
        + Send
        + Sync
        + 'static,
{
    async fn run(
        &self,
        params: &GuardedParams,
        response: &mut ActionResponse,
    ) -> Result<(), HandlerFault> {
        (self.0)(params, response)
    }
}

/// Wrap a synchronous closure as a handler.
///
/// Most actions don't suspend; this spares them an `async_trait` impl.
///
/// ```rust
/// use quasar_action::handler::handler_fn;
///
/// let handler = handler_fn(|params, response| {
///     response.set("echo", params.to_value());
///     Ok(())
/// });
/// ```
pub fn handler_fn<F>(f: F) -> Arc<dyn Handler>
where
    F: Fn(&GuardedParams, &mut ActionResponse) -> Result<(), HandlerFault>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnHandler(f))
}
