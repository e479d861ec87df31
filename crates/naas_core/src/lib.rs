//! naas_core - chaos fault-injection decision engine
//!
//! Sits behind an HTTP adapter and decides, per request, whether to
//! intercept and answer with a synthetic error: eligibility filtering
//! (environment, method, routes), weighted error selection, probabilistic
//! delay, and a runtime-mutable configuration published as an atomically
//! swapped snapshot. This crate carries no HTTP types; `naas_http`
//! provides the axum/tower adapter.

pub mod config;
pub mod context;
pub mod delay;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod response;
pub mod route;
pub mod sampler;
pub mod selector;

/// Version reported in injected responses and stats snapshots
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::{ConfigUpdate, DelayPolicy, EngineConfig, ErrorDefinition, ResponseFormat};
pub use context::RequestContext;
pub use engine::{ChaosEngine, Decision, EngineStats};
pub use error::{ConfigError, EngineError};
pub use hooks::{ChaosHook, FnHook, HookOutcome};
pub use logging::{ChaosLogger, LogLevel, NoopLogger, TracingLogger};
pub use response::{HEADER_CHAOS_INJECTED, HEADER_CHAOS_VERSION, InjectedResponse};
pub use route::RoutePattern;
pub use sampler::{Sampler, ThreadRngSampler};
