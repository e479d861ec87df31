//! Engine configuration
//!
//! Validated, normalized representation of everything the decision engine
//! reads at request time. Construction and every update run the same
//! validation; weights are re-normalized whenever the catalog changes.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hooks::ChaosHook;
use crate::route::RoutePattern;

/// Weight applied when an entry leaves it unset (or sets a non-positive one)
const DEFAULT_WEIGHT: f64 = 1.0;

const fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

const fn default_true() -> bool {
    true
}

/// One entry of the injectable error catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDefinition {
    /// HTTP status code to inject
    pub code: u16,
    /// Human-readable error message placed in the response envelope
    pub message: String,
    /// Relative selection weight; defaults to 1
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Weight divided by the catalog total; recomputed on every catalog change
    #[serde(skip)]
    pub normalized_weight: f64,
}

impl ErrorDefinition {
    /// Create a catalog entry with an explicit weight
    pub fn new(code: u16, message: impl Into<String>, weight: f64) -> Self {
        Self {
            code,
            message: message.into(),
            weight,
            normalized_weight: 0.0,
        }
    }

    /// Effective weight used for normalization (unset/zero falls back to 1;
    /// negative weights are rejected by validation before this runs)
    fn effective_weight(&self) -> f64 {
        if self.weight > 0.0 {
            self.weight
        } else {
            DEFAULT_WEIGHT
        }
    }
}

/// Probabilistic latency injection parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayPolicy {
    /// Whether delay injection is active at all
    pub enabled: bool,
    /// Lower bound of the injected delay, milliseconds
    pub min_ms: u64,
    /// Upper bound (exclusive) of the injected delay, milliseconds
    pub max_ms: u64,
    /// Chance in [0, 100] that an eligible request is delayed
    pub probability: f64,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            min_ms: 100,
            max_ms: 1_000,
            probability: 20.0,
        }
    }
}

impl DelayPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.probability) {
            return Err(ConfigError::InvalidDelayPolicy(format!(
                "probability must be within [0, 100], got {}",
                self.probability
            )));
        }
        if self.max_ms < self.min_ms {
            return Err(ConfigError::InvalidDelayPolicy(format!(
                "max_ms ({}) must be >= min_ms ({})",
                self.max_ms, self.min_ms
            )));
        }
        Ok(())
    }
}

/// Body rendering for injected responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Structured `{"error": {...}}` envelope
    #[default]
    Json,
    /// Minimal `<error>...</error>` document
    Xml,
    /// The error message text only
    Plain,
}

/// The live engine configuration
///
/// Created once at startup, replaced wholesale by [`merged`](Self::merged)
/// candidates at update time. Request evaluation only ever reads an
/// immutable snapshot of this struct.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Percent of eligible traffic that receives an injected error, [0, 100]
    pub error_rate: f64,
    /// Only paths matching one of these are eligible (empty = all paths)
    pub target_routes: Vec<RoutePattern>,
    /// Paths matching any of these are never eligible; wins over targets
    pub exclude_routes: Vec<RoutePattern>,
    /// HTTP methods subject to chaos (case-insensitive)
    pub target_methods: HashSet<String>,
    /// Injectable error catalog; never empty
    pub errors: Vec<ErrorDefinition>,
    /// Latency injection parameters
    pub delay: DelayPolicy,
    /// Body rendering for injected responses
    pub response_format: ResponseFormat,
    /// Extra response headers, applied after the engine's own
    pub custom_headers: Vec<(String, String)>,
    /// Deployment environments in which the engine is live
    pub active_environments: HashSet<String>,
    /// Predicates run in order ahead of the standard pipeline
    #[serde(skip)]
    pub hooks: Vec<Arc<dyn ChaosHook>>,
    /// Emit an info event for every injected decision
    #[serde(default = "default_true")]
    pub log_decisions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            error_rate: 10.0,
            target_routes: Vec::new(),
            exclude_routes: Vec::new(),
            target_methods: ["GET", "POST", "PUT", "DELETE", "PATCH"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            errors: vec![
                ErrorDefinition::new(500, "Internal Server Error", 1.0),
                ErrorDefinition::new(502, "Bad Gateway", 1.0),
                ErrorDefinition::new(503, "Service Unavailable", 1.0),
            ],
            delay: DelayPolicy::default(),
            response_format: ResponseFormat::default(),
            custom_headers: Vec::new(),
            active_environments: ["development".to_string()].into_iter().collect(),
            hooks: Vec::new(),
            log_decisions: true,
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("error_rate", &self.error_rate)
            .field("target_routes", &self.target_routes)
            .field("exclude_routes", &self.exclude_routes)
            .field("target_methods", &self.target_methods)
            .field("errors", &self.errors)
            .field("delay", &self.delay)
            .field("response_format", &self.response_format)
            .field("custom_headers", &self.custom_headers)
            .field("active_environments", &self.active_environments)
            .field("hooks", &self.hooks.len())
            .field("log_decisions", &self.log_decisions)
            .finish()
    }
}

impl EngineConfig {
    /// Validate the candidate and normalize catalog weights
    ///
    /// Every construction and update path goes through here; an invalid
    /// candidate is rejected whole, nothing is silently coerced.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.validate()?;
        self.normalize_weights();
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.error_rate) || self.error_rate.is_nan() {
            return Err(ConfigError::InvalidErrorRate(self.error_rate));
        }
        if self.errors.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for (index, definition) in self.errors.iter().enumerate() {
            if definition.code == 0 {
                return Err(ConfigError::invalid_definition(
                    index,
                    "code must be a positive HTTP status",
                ));
            }
            if definition.message.is_empty() {
                return Err(ConfigError::invalid_definition(
                    index,
                    "message must not be empty",
                ));
            }
            // Zero means "unset" and defaults to 1; negative is a mistake
            if definition.weight < 0.0 || definition.weight.is_nan() {
                return Err(ConfigError::invalid_definition(
                    index,
                    "weight must be a positive number",
                ));
            }
        }
        self.delay.validate()
    }

    /// Recompute `normalized_weight` over the whole catalog
    fn normalize_weights(&mut self) {
        let total: f64 = self.errors.iter().map(ErrorDefinition::effective_weight).sum();
        for definition in &mut self.errors {
            definition.normalized_weight = definition.effective_weight() / total;
        }
    }

    /// Apply a partial update on top of this config and re-validate
    ///
    /// Unspecified fields keep their current values; the returned candidate
    /// is fully validated and re-normalized.
    pub fn merged(&self, update: ConfigUpdate) -> Result<Self, ConfigError> {
        let mut candidate = self.clone();
        if let Some(error_rate) = update.error_rate {
            candidate.error_rate = error_rate;
        }
        if let Some(target_routes) = update.target_routes {
            candidate.target_routes = target_routes;
        }
        if let Some(exclude_routes) = update.exclude_routes {
            candidate.exclude_routes = exclude_routes;
        }
        if let Some(target_methods) = update.target_methods {
            candidate.target_methods = target_methods;
        }
        if let Some(errors) = update.errors {
            candidate.errors = errors;
        }
        if let Some(delay) = update.delay {
            candidate.delay = delay;
        }
        if let Some(response_format) = update.response_format {
            candidate.response_format = response_format;
        }
        if let Some(custom_headers) = update.custom_headers {
            candidate.custom_headers = custom_headers;
        }
        if let Some(active_environments) = update.active_environments {
            candidate.active_environments = active_environments;
        }
        if let Some(hooks) = update.hooks {
            candidate.hooks = hooks;
        }
        if let Some(log_decisions) = update.log_decisions {
            candidate.log_decisions = log_decisions;
        }
        candidate.validated()
    }

    /// Whether `method` is one of the targeted HTTP methods
    #[must_use]
    pub fn targets_method(&self, method: &str) -> bool {
        self.target_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }

    /// Whether `environment` is one of the active deployment environments
    #[must_use]
    pub fn active_in(&self, environment: &str) -> bool {
        self.active_environments.contains(environment)
    }
}

/// A partial configuration change
///
/// Every field is optional; `None` keeps the current value. Hooks cannot
/// be expressed in serialized form and are settable programmatically only.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub error_rate: Option<f64>,
    pub target_routes: Option<Vec<RoutePattern>>,
    pub exclude_routes: Option<Vec<RoutePattern>>,
    pub target_methods: Option<HashSet<String>>,
    pub errors: Option<Vec<ErrorDefinition>>,
    pub delay: Option<DelayPolicy>,
    pub response_format: Option<ResponseFormat>,
    pub custom_headers: Option<Vec<(String, String)>>,
    pub active_environments: Option<HashSet<String>>,
    #[serde(skip)]
    pub hooks: Option<Vec<Arc<dyn ChaosHook>>>,
    pub log_decisions: Option<bool>,
}

impl fmt::Debug for ConfigUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigUpdate")
            .field("error_rate", &self.error_rate)
            .field("target_routes", &self.target_routes)
            .field("exclude_routes", &self.exclude_routes)
            .field("target_methods", &self.target_methods)
            .field("errors", &self.errors)
            .field("delay", &self.delay)
            .field("response_format", &self.response_format)
            .field("custom_headers", &self.custom_headers)
            .field("active_environments", &self.active_environments)
            .field("hooks", &self.hooks.as_ref().map(Vec::len))
            .field("log_decisions", &self.log_decisions)
            .finish()
    }
}

impl ConfigUpdate {
    /// Update that only changes the error rate
    #[must_use]
    pub fn error_rate(rate: f64) -> Self {
        Self {
            error_rate: Some(rate),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_weights(config: &EngineConfig) -> f64 {
        config.errors.iter().map(|e| e.normalized_weight).sum()
    }

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default().validated().unwrap();
        assert!((catalog_weights(&config) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        let mut config = EngineConfig::default();
        config.errors = vec![
            ErrorDefinition::new(500, "a", 50.0),
            ErrorDefinition::new(502, "b", 30.0),
            ErrorDefinition::new(503, "c", 20.0),
        ];
        let config = config.validated().unwrap();

        assert!((config.errors[0].normalized_weight - 0.5).abs() < 1e-9);
        assert!((config.errors[1].normalized_weight - 0.3).abs() < 1e-9);
        assert!((config.errors[2].normalized_weight - 0.2).abs() < 1e-9);
    }

    #[test]
    fn unset_weight_defaults_to_one() {
        let mut config = EngineConfig::default();
        config.errors = vec![
            ErrorDefinition::new(500, "explicit", 3.0),
            ErrorDefinition::new(503, "falsy", 0.0),
        ];
        let config = config.validated().unwrap();

        assert!((config.errors[0].normalized_weight - 0.75).abs() < 1e-9);
        assert!((config.errors[1].normalized_weight - 0.25).abs() < 1e-9);
    }

    #[test]
    fn error_rate_out_of_range_rejected() {
        let mut config = EngineConfig::default();
        config.error_rate = -1.0;
        assert!(matches!(
            config.clone().validated(),
            Err(ConfigError::InvalidErrorRate(_))
        ));

        config.error_rate = 101.0;
        assert!(matches!(
            config.validated(),
            Err(ConfigError::InvalidErrorRate(_))
        ));
    }

    #[test]
    fn empty_catalog_rejected() {
        let mut config = EngineConfig::default();
        config.errors.clear();
        assert!(matches!(config.validated(), Err(ConfigError::EmptyCatalog)));
    }

    #[test]
    fn entry_without_code_rejected() {
        let mut config = EngineConfig::default();
        config.errors = vec![ErrorDefinition::new(0, "no code", 1.0)];
        let err = config.validated().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidErrorDefinition { index: 0, .. }
        ));
    }

    #[test]
    fn entry_without_message_rejected() {
        let mut config = EngineConfig::default();
        config.errors = vec![
            ErrorDefinition::new(500, "ok", 1.0),
            ErrorDefinition::new(503, "", 1.0),
        ];
        let err = config.validated().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidErrorDefinition { index: 1, .. }
        ));
    }

    #[test]
    fn negative_weight_rejected() {
        let mut config = EngineConfig::default();
        config.errors = vec![ErrorDefinition::new(500, "skewed", -2.0)];
        let err = config.validated().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidErrorDefinition { index: 0, .. }
        ));
    }

    #[test]
    fn delay_policy_probability_out_of_range_rejected() {
        let mut config = EngineConfig::default();
        config.delay.probability = 150.0;
        assert!(matches!(
            config.validated(),
            Err(ConfigError::InvalidDelayPolicy(_))
        ));
    }

    #[test]
    fn delay_policy_inverted_bounds_rejected() {
        let mut config = EngineConfig::default();
        config.delay.min_ms = 500;
        config.delay.max_ms = 100;
        assert!(matches!(
            config.validated(),
            Err(ConfigError::InvalidDelayPolicy(_))
        ));
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let base = EngineConfig::default().validated().unwrap();
        let merged = base.merged(ConfigUpdate::error_rate(75.0)).unwrap();

        assert!((merged.error_rate - 75.0).abs() < f64::EPSILON);
        assert_eq!(merged.errors.len(), base.errors.len());
        assert_eq!(merged.response_format, base.response_format);
        assert_eq!(merged.active_environments, base.active_environments);
    }

    #[test]
    fn merge_renormalizes_replaced_catalog() {
        let base = EngineConfig::default().validated().unwrap();
        let merged = base
            .merged(ConfigUpdate {
                errors: Some(vec![
                    ErrorDefinition::new(500, "a", 9.0),
                    ErrorDefinition::new(503, "b", 1.0),
                ]),
                ..ConfigUpdate::default()
            })
            .unwrap();

        assert!((merged.errors[0].normalized_weight - 0.9).abs() < 1e-9);
        assert!((catalog_weights(&merged) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn merge_with_invalid_rate_fails() {
        let base = EngineConfig::default().validated().unwrap();
        assert!(matches!(
            base.merged(ConfigUpdate::error_rate(101.0)),
            Err(ConfigError::InvalidErrorRate(_))
        ));
    }

    #[test]
    fn targets_method_is_case_insensitive() {
        let config = EngineConfig::default();
        assert!(config.targets_method("get"));
        assert!(config.targets_method("GET"));
        assert!(!config.targets_method("OPTIONS"));
    }

    #[test]
    fn active_in_checks_membership() {
        let config = EngineConfig::default();
        assert!(config.active_in("development"));
        assert!(!config.active_in("production"));
    }

    #[test]
    fn config_update_deserializes_from_json() {
        let update: ConfigUpdate = serde_json::from_str(
            r#"{
                "error_rate": 42.5,
                "target_routes": ["/api", {"regex": "^/v[0-9]+"}],
                "errors": [{"code": 500, "message": "boom"}],
                "response_format": "xml"
            }"#,
        )
        .unwrap();

        assert_eq!(update.error_rate, Some(42.5));
        assert_eq!(update.target_routes.as_ref().map(Vec::len), Some(2));
        let errors = update.errors.as_ref().unwrap();
        assert!((errors[0].weight - 1.0).abs() < f64::EPSILON);
        assert_eq!(update.response_format, Some(ResponseFormat::Xml));
        assert!(update.delay.is_none());
    }

    mod weight_properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn normalization_sums_to_one(weights in prop::collection::vec(0.0f64..1_000.0, 1..20)) {
                let mut config = EngineConfig::default();
                config.errors = weights
                    .iter()
                    .enumerate()
                    .map(|(i, w)| ErrorDefinition::new(500, format!("e{i}"), *w))
                    .collect();

                let config = config.validated().unwrap();
                let total: f64 = config.errors.iter().map(|e| e.normalized_weight).sum();
                prop_assert!((total - 1.0).abs() < 1e-6);
            }
        }
    }
}
