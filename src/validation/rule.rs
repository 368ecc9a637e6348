//! Field rules: how one header is validated.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;

use crate::validation::checks;

/// A pluggable predicate run against a present header value.
///
/// Runs in addition to the rule's type check, never instead of it.
pub trait CustomCheck: Send + Sync {
    /// Returns true if the value is acceptable.
    fn check(&self, value: &str) -> bool;

    /// Short label used in logs and `Debug` output.
    fn describe(&self) -> &str {
        "custom"
    }
}

impl<F> CustomCheck for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn check(&self, value: &str) -> bool {
        self(value)
    }
}

/// Value must match a regular expression.
#[derive(Debug, Clone)]
pub struct PatternCheck {
    pattern: Regex,
}

impl PatternCheck {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl CustomCheck for PatternCheck {
    fn check(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    fn describe(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Value must be one of a fixed set (exact, case-sensitive).
#[derive(Debug, Clone)]
pub struct AllowListCheck {
    allowed: BTreeSet<String>,
}

impl AllowListCheck {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl CustomCheck for AllowListCheck {
    fn check(&self, value: &str) -> bool {
        self.allowed.contains(value)
    }

    fn describe(&self) -> &str {
        "allow-list"
    }
}

/// Inclusive character-count bounds for text headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

impl LengthBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Bounds with only a lower limit.
    pub fn at_least(min: usize) -> Self {
        Self { min, max: usize::MAX }
    }

    /// Bounds with only an upper limit.
    pub fn at_most(max: usize) -> Self {
        Self { min: 0, max }
    }

    pub fn is_well_formed(&self) -> bool {
        self.min <= self.max
    }

    /// Inverted bounds contain nothing.
    pub fn contains(&self, len: usize) -> bool {
        len >= self.min && len <= self.max
    }
}

/// The format a header value must have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    /// Free text, optionally bounded in characters.
    Text(Option<LengthBounds>),
    Uuid,
    Email,
    /// A kind name this crate does not know. Always fails validation.
    Unrecognized(String),
}

impl FieldKind {
    pub fn name(&self) -> &str {
        match self {
            FieldKind::Integer => "int",
            FieldKind::Text(_) => "string",
            FieldKind::Uuid => "uuid",
            FieldKind::Email => "email",
            FieldKind::Unrecognized(name) => name,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FieldKind::Text(_))
    }
}

/// Parsing never fails: unknown names become [`FieldKind::Unrecognized`] so
/// that callers decide whether to reject them up front or let them fail closed.
impl FromStr for FieldKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "int" | "integer" => FieldKind::Integer,
            "string" | "text" => FieldKind::Text(None),
            "uuid" => FieldKind::Uuid,
            "email" => FieldKind::Email,
            _ => FieldKind::Unrecognized(s.to_string()),
        })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One schema entry. Immutable once built; cheap to clone.
#[derive(Clone)]
pub struct FieldRule {
    kind: FieldKind,
    required: bool,
    custom: Option<Arc<dyn CustomCheck>>,
}

impl FieldRule {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            custom: None,
        }
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn text() -> Self {
        Self::new(FieldKind::Text(None))
    }

    pub fn text_bounded(min: usize, max: usize) -> Self {
        Self::new(FieldKind::Text(Some(LengthBounds::new(min, max))))
    }

    pub fn uuid() -> Self {
        Self::new(FieldKind::Uuid)
    }

    pub fn email() -> Self {
        Self::new(FieldKind::Email)
    }

    /// Mark the header as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a custom check, replacing any previous one.
    pub fn with_check(mut self, check: impl CustomCheck + 'static) -> Self {
        self.custom = Some(Arc::new(check));
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn has_custom_check(&self) -> bool {
        self.custom.is_some()
    }

    /// Result of the custom check, or `None` when no check is configured.
    pub fn run_custom_check(&self, value: &str) -> Option<bool> {
        self.custom.as_ref().map(|c| c.check(value))
    }

    pub fn run_type_check(&self, value: &str) -> bool {
        checks::check_kind(&self.kind, value)
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("custom", &self.custom.as_ref().map(|c| c.describe()))
            .finish()
    }
}
