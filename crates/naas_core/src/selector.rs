//! Weighted error selection
//!
//! Alias-free weighted sampling by cumulative distribution: one uniform
//! draw in [0, 1), walked against the running total of normalized weights.
//! Catalog order only breaks ties under floating error; it does not shift
//! probability mass.

use crate::config::ErrorDefinition;
use crate::sampler::Sampler;

/// Pick one catalog entry according to its normalized weight
///
/// Returns `None` only for an empty catalog, which a validated config
/// never produces. Floating-point drift that leaves the draw above the
/// final running total falls back to the first entry.
#[must_use]
pub fn select_error<'a>(
    catalog: &'a [ErrorDefinition],
    sampler: &dyn Sampler,
) -> Option<&'a ErrorDefinition> {
    let draw = sampler.unit();
    let mut running_total = 0.0;
    for definition in catalog {
        running_total += definition.normalized_weight;
        if draw <= running_total {
            return Some(definition);
        }
    }
    catalog.first()
}
