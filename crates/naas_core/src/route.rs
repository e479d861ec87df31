//! Route pattern matching
//!
//! Patterns are either a literal prefix string or a compiled regular
//! expression. Matching is pure and safe for concurrent use.

use std::fmt;

use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// A configured route pattern
///
/// Serialized form: a plain string for prefix patterns, or
/// `{"regex": "<pattern>"}` for structured patterns.
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// Matches when the path equals the pattern or starts with it
    Prefix(String),
    /// Matches when the expression finds a match in the path
    Regex(Regex),
}

impl RoutePattern {
    /// Create a literal/prefix pattern
    pub fn prefix(pattern: impl Into<String>) -> Self {
        Self::Prefix(pattern.into())
    }

    /// Compile a structured pattern
    pub fn regex(pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| ConfigError::InvalidRoutePattern(e.to_string()))
    }

    /// Check whether `path` matches this pattern
    ///
    /// Prefix semantics: `"/api"` matches `/api` and `/api/anything`,
    /// but not `/ap`.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Prefix(prefix) => path == prefix || path.starts_with(prefix.as_str()),
            Self::Regex(regex) => regex.is_match(path),
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(prefix) => write!(f, "{prefix}"),
            Self::Regex(regex) => write!(f, "regex:{}", regex.as_str()),
        }
    }
}

impl Serialize for RoutePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Prefix(prefix) => serializer.serialize_str(prefix),
            Self::Regex(regex) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("regex", regex.as_str())?;
                map.end()
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternRepr {
    Prefix(String),
    Regex { regex: String },
}

impl<'de> Deserialize<'de> for RoutePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match PatternRepr::deserialize(deserializer)? {
            PatternRepr::Prefix(prefix) => Ok(Self::Prefix(prefix)),
            PatternRepr::Regex { regex } => {
                Self::regex(&regex).map_err(|e| D::Error::custom(e.to_string()))
            },
        }
    }
}

/// Check whether `path` matches any pattern in `patterns`
#[must_use]
pub fn matches_any(path: &str, patterns: &[RoutePattern]) -> bool {
    patterns.iter().any(|pattern| pattern.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matches_exact_path() {
        let pattern = RoutePattern::prefix("/chaos");
        assert!(pattern.matches("/chaos"));
    }

    #[test]
    fn prefix_matches_sub_paths() {
        let pattern = RoutePattern::prefix("/chaos");
        assert!(pattern.matches("/chaos/sub"));
        assert!(pattern.matches("/chaos/sub/deeper"));
    }

    #[test]
    fn prefix_rejects_shorter_path() {
        let pattern = RoutePattern::prefix("/chaos");
        assert!(!pattern.matches("/chao"));
        assert!(!pattern.matches("/"));
    }

    #[test]
    fn regex_matches_iff_test_is_true() {
        let pattern = RoutePattern::regex(r"^/api/v\d+/users$").unwrap();
        assert!(pattern.matches("/api/v1/users"));
        assert!(pattern.matches("/api/v42/users"));
        assert!(!pattern.matches("/api/vx/users"));
        assert!(!pattern.matches("/api/v1/users/7"));
    }

    #[test]
    fn invalid_regex_is_a_config_error() {
        let err = RoutePattern::regex("([unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRoutePattern(_)));
    }

    #[test]
    fn matches_any_short_circuits_over_list() {
        let patterns = vec![
            RoutePattern::prefix("/admin"),
            RoutePattern::regex(r"^/internal/").unwrap(),
        ];
        assert!(matches_any("/admin/users", &patterns));
        assert!(matches_any("/internal/metrics", &patterns));
        assert!(!matches_any("/public", &patterns));
    }

    #[test]
    fn matches_any_empty_list_never_matches() {
        assert!(!matches_any("/anything", &[]));
    }

    #[test]
    fn deserializes_plain_string_as_prefix() {
        let pattern: RoutePattern = serde_json::from_str(r#""/api""#).unwrap();
        assert!(matches!(pattern, RoutePattern::Prefix(ref p) if p == "/api"));
    }

    #[test]
    fn deserializes_regex_object() {
        let pattern: RoutePattern = serde_json::from_str(r#"{"regex": "^/v1"}"#).unwrap();
        assert!(pattern.matches("/v1/orders"));
        assert!(!pattern.matches("/v2/orders"));
    }

    #[test]
    fn invalid_regex_fails_deserialization() {
        let result: Result<RoutePattern, _> = serde_json::from_str(r#"{"regex": "(bad"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_back_to_input_shape() {
        let prefix = RoutePattern::prefix("/api");
        assert_eq!(serde_json::to_string(&prefix).unwrap(), r#""/api""#);

        let regex = RoutePattern::regex("^/v1").unwrap();
        assert_eq!(serde_json::to_string(&regex).unwrap(), r#"{"regex":"^/v1"}"#);
    }
}
