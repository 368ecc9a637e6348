//! Built-in type checkers.
//!
//! Each checker is a pure predicate over a non-empty header value. Presence
//! is decided by the engine before any of these run.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::validation::rule::{FieldKind, LengthBounds};

/// Length of the canonical 8-4-4-4-12 UUID form.
const HYPHENATED_UUID_LEN: usize = 36;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex constant")
});

/// Run the type check for `kind` against `value`.
pub fn check_kind(kind: &FieldKind, value: &str) -> bool {
    match kind {
        FieldKind::Integer => is_integer(value),
        FieldKind::Text(bounds) => is_text(value, bounds.as_ref()),
        FieldKind::Uuid => is_uuid(value),
        FieldKind::Email => is_email(value),
        // Cannot be validated, so never valid.
        FieldKind::Unrecognized(_) => false,
    }
}

/// Base-10, optionally signed, fits in an `i64`.
pub fn is_integer(value: &str) -> bool {
    value.parse::<i64>().is_ok()
}

/// Character count within the bounds; unbounded text only needs to be non-empty.
pub fn is_text(value: &str, bounds: Option<&LengthBounds>) -> bool {
    match bounds {
        Some(bounds) => bounds.contains(value.chars().count()),
        None => !value.is_empty(),
    }
}

/// Canonical hyphenated UUID, any variant or version.
///
/// The `uuid` parser also accepts the simple, braced and URN forms; the
/// length gate restricts it to 8-4-4-4-12.
pub fn is_uuid(value: &str) -> bool {
    value.len() == HYPHENATED_UUID_LEN && Uuid::try_parse(value).is_ok()
}

/// Permissive `local@domain.tld` syntax check. No DNS lookups.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
