//! Custom chaos hooks
//!
//! Hooks run strictly in configured order before the standard pipeline,
//! awaited one at a time. A hook either lets processing continue, or
//! takes over the request entirely with its own response, which suppresses
//! eligibility, delay and selection for that request. A hook error aborts
//! processing and reaches the adapter as a fault.

use std::future::Future;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::response::InjectedResponse;

/// Outcome of a single hook invocation
#[derive(Debug)]
pub enum HookOutcome {
    /// Proceed with the standard eligibility pipeline
    Continue,
    /// The hook fully produced the response; the engine stops here
    Handled(InjectedResponse),
}

/// A user-supplied predicate run ahead of the standard pipeline
///
/// Hooks may suspend (perform I/O); the engine awaits each before moving
/// to the next.
#[async_trait]
pub trait ChaosHook: Send + Sync {
    async fn run(&self, ctx: &RequestContext) -> anyhow::Result<HookOutcome>;
}

/// Adapter turning an async closure into a [`ChaosHook`]
pub struct FnHook<F>(F);

impl<F> FnHook<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> std::fmt::Debug for FnHook<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnHook")
    }
}

#[async_trait]
impl<F, Fut> ChaosHook for FnHook<F>
where
    F: Fn(RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<HookOutcome>> + Send,
{
    async fn run(&self, ctx: &RequestContext) -> anyhow::Result<HookOutcome> {
        (self.0)(ctx.clone()).await
    }
}
