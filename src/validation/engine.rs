//! The validation engine.
//!
//! # Responsibilities
//! - Look up each declared header
//! - Apply presence, custom and type checks per rule
//! - Aggregate every failure into one result
//!
//! # Design Decisions
//! - Absent and empty values are the same thing
//! - A missing required header gets exactly one `Missing` and no further checks
//! - Custom and type checks are independent; both may fail for one header
//! - Pure function of (headers, schema): no I/O, no state, no errors

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use axum::http::HeaderMap;
use serde::Serialize;

use crate::validation::rule::FieldRule;
use crate::validation::schema::Schema;

/// Why a header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Required header absent or empty.
    Missing,
    /// Header present but rejected by its custom check or type check.
    Invalid,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Missing => "missing",
            FailureReason::Invalid => "invalid",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated rule for one header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ValidationFailure {
    pub header: String,
    pub reason: FailureReason,
}

impl ValidationFailure {
    pub fn missing(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            reason: FailureReason::Missing,
        }
    }

    pub fn invalid(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            reason: FailureReason::Invalid,
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} header {}", self.reason, self.header)
    }
}

/// All failures for one request. Empty means the request is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures in evaluation order, which follows schema iteration order.
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Failures sorted by header name, then reason. For presentation.
    pub fn sorted(mut self) -> Vec<ValidationFailure> {
        self.failures.sort();
        self.failures
    }

    fn push(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }
}

/// Result of looking up one header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLookup<'a> {
    /// Not sent, or sent empty.
    Absent,
    Present(&'a str),
    /// Sent, but the bytes are not readable as text.
    Opaque,
}

impl<'a> HeaderLookup<'a> {
    /// Normalizes empty strings to `Absent`.
    pub fn from_value(value: Option<&'a str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => HeaderLookup::Present(v),
            _ => HeaderLookup::Absent,
        }
    }
}

/// Anything headers can be read from.
pub trait HeaderSource {
    fn lookup(&self, name: &str) -> HeaderLookup<'_>;
}

/// Case-insensitive lookup; first value wins when a header repeats.
impl HeaderSource for HeaderMap {
    fn lookup(&self, name: &str) -> HeaderLookup<'_> {
        match self.get(name) {
            None => HeaderLookup::Absent,
            Some(value) => match value.to_str() {
                Ok(text) => HeaderLookup::from_value(Some(text)),
                Err(_) => HeaderLookup::Opaque,
            },
        }
    }
}

impl HeaderSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> HeaderLookup<'_> {
        HeaderLookup::from_value(self.get(name).map(String::as_str))
    }
}

impl HeaderSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> HeaderLookup<'_> {
        HeaderLookup::from_value(self.get(name).map(String::as_str))
    }
}

/// Validate `headers` against every rule in `schema`.
pub fn validate<H>(headers: &H, schema: &Schema) -> ValidationResult
where
    H: HeaderSource + ?Sized,
{
    let mut result = ValidationResult::default();

    for (name, rule) in schema.iter() {
        for reason in evaluate(rule, headers.lookup(name)) {
            result.push(ValidationFailure {
                header: name.to_string(),
                reason,
            });
        }
    }

    result
}

/// Apply one rule to one looked-up value. Yields at most two reasons.
pub fn evaluate(rule: &FieldRule, lookup: HeaderLookup<'_>) -> Vec<FailureReason> {
    let value = match lookup {
        HeaderLookup::Absent if rule.is_required() => return vec![FailureReason::Missing],
        HeaderLookup::Absent => return Vec::new(),
        HeaderLookup::Opaque => return vec![FailureReason::Invalid],
        HeaderLookup::Present(value) => value,
    };

    let mut reasons = Vec::new();
    if rule.run_custom_check(value) == Some(false) {
        reasons.push(FailureReason::Invalid);
    }
    if !rule.run_type_check(value) {
        reasons.push(FailureReason::Invalid);
    }
    reasons
}
