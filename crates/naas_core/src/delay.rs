//! Delay injection
//!
//! Decides whether to hold an eligible request and for how long. This
//! module only produces the duration; the adapter owns the suspension so
//! one delayed request never blocks the evaluation of others.

use std::time::Duration;

use crate::config::DelayPolicy;
use crate::sampler::Sampler;

/// Probabilistically pick an injected delay under `policy`
///
/// Returns `None` when the policy is disabled or the roll misses;
/// otherwise a uniform duration in `[min_ms, max_ms)`.
#[must_use]
pub fn maybe_delay(policy: &DelayPolicy, sampler: &dyn Sampler) -> Option<Duration> {
    if !policy.enabled {
        return None;
    }
    if sampler.roll_percent() > policy.probability {
        return None;
    }
    Some(Duration::from_millis(
        sampler.duration_ms(policy.min_ms, policy.max_ms),
    ))
}
