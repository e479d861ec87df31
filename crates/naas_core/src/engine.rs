//! Chaos decision engine
//!
//! One engine instance owns one live configuration snapshot and decides,
//! per request, whether to pass through or substitute a synthetic error.
//! Snapshots are swapped atomically: a concurrent request sees either the
//! fully-old or fully-new config, never a half-merged one. The mutation
//! paths (update, enable, disable) serialize on a single lock.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::Serialize;

use crate::config::{ConfigUpdate, EngineConfig};
use crate::context::RequestContext;
use crate::error::{ConfigError, EngineError};
use crate::hooks::HookOutcome;
use crate::logging::{ChaosLogger, TracingLogger};
use crate::response::InjectedResponse;
use crate::sampler::{Sampler, ThreadRngSampler};
use crate::{delay, eligibility, selector};

/// The engine's verdict for a single request
#[derive(Debug)]
pub enum Decision {
    /// The host continues normal handling, request untouched
    PassThrough,
    /// A custom hook produced this response; the standard pipeline ran no
    /// eligibility, delay or selection for the request
    Handled(InjectedResponse),
    /// Inject this synthetic error (sleeping its delay first)
    Inject(InjectedResponse),
}

/// Deep snapshot of engine state for observability
///
/// Detached from live state: mutating the engine after taking a snapshot
/// never changes an already-returned value.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    /// Copy of the currently active configuration
    pub config: EngineConfig,
    /// The deployment environment this engine was constructed with
    pub environment: String,
    /// Engine crate version
    pub version: &'static str,
    /// False while `disable()` holds the error rate at zero
    pub enabled: bool,
}

/// The fault-injection decision engine
///
/// Cheap to share behind an `Arc`; all request-time access is lock-free
/// reads of the current config snapshot.
pub struct ChaosEngine {
    config: ArcSwap<EngineConfig>,
    /// Error rate captured by `disable()`, restored by `enable()`.
    /// Doubles as the serialization point for all mutations.
    saved_error_rate: Mutex<Option<f64>>,
    environment: String,
    sampler: Arc<dyn Sampler>,
    logger: Arc<dyn ChaosLogger>,
}

impl fmt::Debug for ChaosEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaosEngine")
            .field("environment", &self.environment)
            .field("config", &self.config.load())
            .finish_non_exhaustive()
    }
}

impl ChaosEngine {
    /// Build an engine for `environment` from a candidate configuration
    ///
    /// The candidate is validated and weight-normalized; an invalid one is
    /// rejected here and no engine is constructed.
    pub fn new(config: EngineConfig, environment: impl Into<String>) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        Ok(Self {
            config: ArcSwap::new(Arc::new(config)),
            saved_error_rate: Mutex::new(None),
            environment: environment.into(),
            sampler: Arc::new(ThreadRngSampler),
            logger: Arc::new(TracingLogger),
        })
    }

    /// Replace the logging sink (default: tracing)
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn ChaosLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the random source (default: thread-local RNG)
    #[must_use]
    pub fn with_sampler(mut self, sampler: Arc<dyn Sampler>) -> Self {
        self.sampler = sampler;
        self
    }

    /// The deployment environment this engine checks eligibility against
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Decide what happens to one request
    ///
    /// Hooks run first, in order, each awaited; a hook taking over the
    /// request stops all further processing. Otherwise the eligibility
    /// filter gates, the delay roll may attach a suspension, and a weighted
    /// catalog pick produces the response artifact. Any fault is logged at
    /// error level and surfaced; the request is never left undecided.
    pub async fn decide(&self, ctx: &RequestContext) -> Result<Decision, EngineError> {
        let result = self.decide_inner(ctx).await;
        if let Err(ref fault) = result {
            self.logger.error(&format!(
                "chaos processing fault on {} {}: {fault}",
                ctx.method, ctx.path
            ));
        }
        result
    }

    async fn decide_inner(&self, ctx: &RequestContext) -> Result<Decision, EngineError> {
        let config = self.config.load_full();

        for hook in &config.hooks {
            match hook.run(ctx).await.map_err(EngineError::Hook)? {
                HookOutcome::Continue => {},
                HookOutcome::Handled(response) => return Ok(Decision::Handled(response)),
            }
        }

        if !eligibility::should_apply_chaos(ctx, &self.environment, &config, &*self.sampler) {
            return Ok(Decision::PassThrough);
        }

        let delay = delay::maybe_delay(&config.delay, &*self.sampler);

        let error = selector::select_error(&config.errors, &*self.sampler).ok_or_else(|| {
            EngineError::Processing("error catalog is empty".to_string())
        })?;

        let response = InjectedResponse::for_error(
            error,
            ctx,
            config.response_format,
            &config.custom_headers,
            delay,
        );

        if config.log_decisions {
            self.logger.info(&format!(
                "chaos injected on {} {}: {} {}",
                ctx.method, ctx.path, error.code, error.message
            ));
        }

        Ok(Decision::Inject(response))
    }

    /// Merge a partial update, validate, and publish atomically
    ///
    /// On failure the previous config stays in effect untouched. An update
    /// that explicitly sets the error rate supersedes a pending
    /// [`disable`](Self::disable): the saved slot is dropped so the engine
    /// reports enabled and a later `enable()` cannot clobber the new rate.
    pub fn update_config(&self, update: ConfigUpdate) -> Result<(), ConfigError> {
        let mut saved = self.saved_error_rate.lock();
        let sets_rate = update.error_rate.is_some();
        let candidate = self.config.load().merged(update)?;
        self.config.store(Arc::new(candidate));
        if sets_rate {
            *saved = None;
        }
        Ok(())
    }

    /// Suspend injection: save the current error rate and force it to zero
    ///
    /// Idempotent; repeated calls keep the originally saved rate.
    pub fn disable(&self) {
        let mut saved = self.saved_error_rate.lock();
        if saved.is_some() {
            return;
        }
        let current = self.config.load_full();
        *saved = Some(current.error_rate);

        let mut zeroed = (*current).clone();
        zeroed.error_rate = 0.0;
        self.config.store(Arc::new(zeroed));
        self.logger.info("chaos injection disabled");
    }

    /// Restore the error rate captured by [`disable`](Self::disable)
    ///
    /// No-op when nothing is saved.
    pub fn enable(&self) {
        let mut saved = self.saved_error_rate.lock();
        if let Some(rate) = saved.take() {
            let mut restored = (**self.config.load()).clone();
            restored.error_rate = rate;
            self.config.store(Arc::new(restored));
            self.logger.info("chaos injection enabled");
        }
    }

    /// Snapshot current config, environment and version
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            config: (**self.config.load()).clone(),
            environment: self.environment.clone(),
            version: crate::ENGINE_VERSION,
            enabled: self.saved_error_rate.lock().is_none(),
        }
    }
}
