//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check header rules (names, kinds, length bounds, patterns)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GuardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};
use regex::Regex;

use crate::config::schema::{GuardConfig, HeaderRuleConfig};
use crate::validation::FieldKind;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than 0",
        ));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", obs.metrics_address),
        ));
    }
    if !matches!(obs.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected \"pretty\" or \"json\", got {:?}", obs.log_format),
        ));
    }

    validate_cors(config, &mut errors);

    for (name, rule) in &config.headers {
        validate_header_rule(name, rule, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_cors(config: &GuardConfig, errors: &mut Vec<ValidationError>) {
    let cors = &config.cors;

    for origin in cors.allowed_origins.iter().filter(|o| *o != "*") {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::new(
                "cors.allowed_origins",
                format!("{:?} is not a valid origin", origin),
            ));
        }
    }
    for method in &cors.allowed_methods {
        if method.to_ascii_uppercase().parse::<Method>().is_err() {
            errors.push(ValidationError::new(
                "cors.allowed_methods",
                format!("{:?} is not an HTTP method", method),
            ));
        }
    }
    for header in cors.allowed_headers.iter().filter(|h| *h != "*") {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::new(
                "cors.allowed_headers",
                format!("{:?} is not a valid header name", header),
            ));
        }
    }
}

fn validate_header_rule(name: &str, rule: &HeaderRuleConfig, errors: &mut Vec<ValidationError>) {
    let field = |key: &str| format!("headers.{}.{}", name, key);

    if HeaderName::from_bytes(name.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            format!("headers.{}", name),
            "not a valid HTTP header name",
        ));
    }

    let kind = match rule.kind.parse::<FieldKind>() {
        Ok(kind) => kind,
        Err(never) => match never {},
    };
    if let FieldKind::Unrecognized(raw) = &kind {
        let message = if raw.is_empty() {
            "is required".to_string()
        } else {
            format!("unknown kind {:?} (expected int, string, uuid or email)", raw)
        };
        errors.push(ValidationError::new(field("kind"), message));
    }

    let has_bounds = rule.min_length.is_some() || rule.max_length.is_some();
    if has_bounds && !kind.is_text() && !matches!(kind, FieldKind::Unrecognized(_)) {
        errors.push(ValidationError::new(
            field("min_length"),
            format!("length bounds only apply to string headers, not {}", kind),
        ));
    }
    for (key, value) in [("min_length", rule.min_length), ("max_length", rule.max_length)] {
        if matches!(value, Some(v) if v < 0) {
            errors.push(ValidationError::new(field(key), "must not be negative"));
        }
    }
    if let (Some(min), Some(max)) = (rule.min_length, rule.max_length) {
        if max < min {
            errors.push(ValidationError::new(
                field("max_length"),
                format!("{} is less than min_length {}", max, min),
            ));
        }
    }

    if let Some(pattern) = &rule.pattern {
        if let Err(e) = Regex::new(pattern) {
            errors.push(ValidationError::new(field("pattern"), e.to_string()));
        }
        if rule.allowed.is_some() {
            errors.push(ValidationError::new(
                field("allowed"),
                "cannot be combined with pattern",
            ));
        }
    }
}
