//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::validation::{AllowListCheck, FieldKind, FieldRule, LengthBounds, PatternCheck, Schema};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Header rules, keyed by header name.
    pub headers: BTreeMap<String, HeaderRuleConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// CORS configuration. Empty method/header lists fall back to defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins echoed back in `Access-Control-Allow-Origin`. `"*"` allows any.
    pub allowed_origins: Vec<String>,

    /// Methods advertised to preflight requests.
    pub allowed_methods: Vec<String>,

    /// Request headers advertised to preflight requests.
    pub allowed_headers: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One `[headers."Name"]` table.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HeaderRuleConfig {
    /// "int", "string", "uuid" or "email".
    pub kind: String,

    pub required: bool,

    /// Minimum length in characters (text only).
    pub min_length: Option<i64>,

    /// Maximum length in characters (text only).
    pub max_length: Option<i64>,

    /// Regex the value must match.
    pub pattern: Option<String>,

    /// Exact values the header may take.
    pub allowed: Option<Vec<String>>,
}

impl HeaderRuleConfig {
    /// Convert into a field rule, rejecting anything the rule cannot express.
    pub fn to_rule(&self, header: &str) -> Result<FieldRule, SchemaError> {
        let mut kind: FieldKind = match self.kind.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        };

        if let FieldKind::Unrecognized(raw) = &kind {
            return Err(SchemaError::UnrecognizedKind {
                header: header.to_string(),
                kind: raw.clone(),
            });
        }

        let min = length_bound(header, "min_length", self.min_length)?;
        let max = length_bound(header, "max_length", self.max_length)?;

        if kind.is_text() {
            let bounds = match (min, max) {
                (None, None) => None,
                (Some(min), None) => Some(LengthBounds::at_least(min)),
                (None, Some(max)) => Some(LengthBounds::at_most(max)),
                (Some(min), Some(max)) => Some(LengthBounds::new(min, max)),
            };
            kind = FieldKind::Text(bounds);
        } else if min.is_some() || max.is_some() {
            return Err(SchemaError::BoundsOnNonText {
                header: header.to_string(),
                kind: kind.to_string(),
            });
        }

        let mut rule = FieldRule::new(kind);
        if self.required {
            rule = rule.required();
        }

        match (&self.pattern, &self.allowed) {
            (Some(_), Some(_)) => {
                return Err(SchemaError::ConflictingChecks {
                    header: header.to_string(),
                })
            }
            (Some(pattern), None) => {
                let check = PatternCheck::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                    header: header.to_string(),
                    message: e.to_string(),
                })?;
                rule = rule.with_check(check);
            }
            (None, Some(allowed)) => {
                rule = rule.with_check(AllowListCheck::new(allowed.iter().cloned()));
            }
            (None, None) => {}
        }

        Ok(rule)
    }
}

fn length_bound(
    header: &str,
    field: &'static str,
    value: Option<i64>,
) -> Result<Option<usize>, SchemaError> {
    value
        .map(|v| {
            usize::try_from(v).map_err(|_| SchemaError::NegativeBound {
                header: header.to_string(),
                field,
                value: v,
            })
        })
        .transpose()
}

impl GuardConfig {
    /// Build the header schema declared under `[headers]`.
    pub fn build_schema(&self) -> Result<Schema, SchemaError> {
        let mut builder = Schema::builder();
        for (name, rule) in &self.headers {
            builder = builder.field(name.clone(), rule.to_rule(name)?);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [listener]
        bind_address = "127.0.0.1:9000"

        [cors]
        allowed_origins = ["https://app.example.com"]

        [headers."X-Request-Id"]
        kind = "uuid"
        required = true

        [headers."X-Name"]
        kind = "string"
        min_length = 3
        max_length = 5

        [headers."X-Client"]
        kind = "string"
        allowed = ["web", "ios"]
    "#;

    #[test]
    fn test_parse_and_build_schema() {
        let config: GuardConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.cors.allowed_origins, vec!["https://app.example.com"]);

        let schema = config.build_schema().unwrap();
        assert_eq!(schema.len(), 3);
        assert!(schema.get("X-Request-Id").unwrap().is_required());
        assert_eq!(
            schema.get("X-Name").unwrap().kind(),
            &FieldKind::Text(Some(LengthBounds::new(3, 5)))
        );
        assert!(schema.get("X-Client").unwrap().has_custom_check());
    }

    #[test]
    fn test_defaults() {
        let config: GuardConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.observability.log_format, "pretty");
        assert!(config.headers.is_empty());
        assert!(config.build_schema().unwrap().is_empty());
    }

    #[test]
    fn test_single_bound() {
        let rule = HeaderRuleConfig {
            kind: "text".into(),
            max_length: Some(4),
            ..Default::default()
        };
        assert_eq!(
            rule.to_rule("X-Tag").unwrap().kind(),
            &FieldKind::Text(Some(LengthBounds::at_most(4)))
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected_by_schema() {
        let config: GuardConfig = toml::from_str(
            r#"
            [headers."X-Addr"]
            kind = "ipv4"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build_schema(),
            Err(SchemaError::UnrecognizedKind { .. })
        ));
    }

    #[test]
    fn test_negative_bound_is_rejected() {
        let rule = HeaderRuleConfig {
            kind: "string".into(),
            min_length: Some(-5),
            max_length: Some(3),
            ..Default::default()
        };
        assert_eq!(
            rule.to_rule("X-Name").unwrap_err(),
            SchemaError::NegativeBound {
                header: "X-Name".into(),
                field: "min_length",
                value: -5,
            }
        );
    }

    #[test]
    fn test_bounds_on_non_text_are_rejected() {
        let rule = HeaderRuleConfig {
            kind: "uuid".into(),
            max_length: Some(10),
            ..Default::default()
        };
        assert_eq!(
            rule.to_rule("X-Id").unwrap_err(),
            SchemaError::BoundsOnNonText {
                header: "X-Id".into(),
                kind: "uuid".into(),
            }
        );
    }

    #[test]
    fn test_pattern_with_allow_list_is_rejected() {
        let rule = HeaderRuleConfig {
            kind: "string".into(),
            pattern: Some("^x$".into()),
            allowed: Some(vec!["a".into()]),
            ..Default::default()
        };
        assert_eq!(
            rule.to_rule("X-Id").unwrap_err(),
            SchemaError::ConflictingChecks {
                header: "X-Id".into()
            }
        );
    }

    #[test]
    fn test_unvalidated_config_fails_schema_build() {
        let mut config = GuardConfig::default();
        config.headers.insert(
            "X-Name".into(),
            HeaderRuleConfig {
                kind: "string".into(),
                min_length: Some(-5),
                max_length: Some(3),
                ..Default::default()
            },
        );
        assert!(matches!(
            config.build_schema(),
            Err(SchemaError::NegativeBound { .. })
        ));
    }
}
