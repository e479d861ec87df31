//! Deployment environment discovery
//!
//! The ambient environment is read once, at layer construction, and passed
//! into the engine explicitly; the decision path never touches process
//! state.

/// Environment variable naming the active deployment environment
pub const ENV_VAR: &str = "CHAOS_ENV";

/// Fallback when the variable is absent or blank
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Resolve the current deployment environment
#[must_use]
pub fn current_environment() -> String {
    std::env::var(ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}
