//! Request eligibility
//!
//! Fixed-order filter pipeline, short-circuiting on the first failure:
//! rate 0, environment, method, excluded routes, targeted routes, rate 100,
//! then the sampling roll. The 0 and 100 shortcuts keep the boundary rates
//! deterministic; everything in between is probabilistic.

use crate::config::EngineConfig;
use crate::context::RequestContext;
use crate::route;
use crate::sampler::Sampler;

/// Decide whether this request is subject to chaos under `config`
///
/// `environment` is the ambient deployment environment, resolved by the
/// adapter and passed in explicitly. Exclusion always wins over targeting.
#[must_use]
pub fn should_apply_chaos(
    ctx: &RequestContext,
    environment: &str,
    config: &EngineConfig,
    sampler: &dyn Sampler,
) -> bool {
    // Rate 0 short-circuits before anything else, including the roll
    if config.error_rate == 0.0 {
        return false;
    }
    if !config.active_in(environment) {
        return false;
    }
    if !config.targets_method(&ctx.method) {
        return false;
    }
    if route::matches_any(&ctx.path, &config.exclude_routes) {
        return false;
    }
    if !config.target_routes.is_empty() && !route::matches_any(&ctx.path, &config.target_routes) {
        return false;
    }
    // Rate 100 bypasses the roll, only after every filter passed
    if config.error_rate >= 100.0 {
        return true;
    }
    sampler.roll_percent() < config.error_rate
}
