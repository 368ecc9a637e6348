//! Offline header checks for the `check` subcommand.

use std::process::ExitCode;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::error::HeaderArgError;
use crate::validation::{validate, Schema, ValidationFailure};

/// Outcome printed by `check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    /// Sorted by header name, then reason.
    pub failures: Vec<ValidationFailure>,
}

impl CheckReport {
    pub fn exit_code(&self) -> ExitCode {
        if self.valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Parse one `"Name: value"` argument. Both sides are trimmed.
pub fn parse_header_arg(raw: &str) -> Result<(HeaderName, HeaderValue), HeaderArgError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| HeaderArgError::Malformed(raw.to_string()))?;
    let name = name.trim();

    let header = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| HeaderArgError::InvalidName(name.to_string()))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|_| HeaderArgError::InvalidValue(name.to_string()))?;
    Ok((header, value))
}

/// Validate the given header arguments against `schema`.
pub fn check_headers(
    schema: &Schema,
    raw_headers: &[String],
) -> Result<CheckReport, HeaderArgError> {
    let mut headers = HeaderMap::new();
    for raw in raw_headers {
        let (name, value) = parse_header_arg(raw)?;
        headers.append(name, value);
    }

    let result = validate(&headers, schema);
    Ok(CheckReport {
        valid: result.is_valid(),
        failures: result.sorted(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldRule;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::builder()
            .field("X-Request-Id", FieldRule::uuid().required())
            .field("X-Account", FieldRule::integer().required())
            .build()
            .unwrap()
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_trims_name_and_value() {
        let (name, value) = parse_header_arg("  X-Account :  42 ").unwrap();
        assert_eq!(name, "x-account");
        assert_eq!(value, "42");
    }

    #[test]
    fn test_value_may_contain_colons() {
        let (_, value) = parse_header_arg("X-Callback: http://localhost:8080").unwrap();
        assert_eq!(value, "http://localhost:8080");
    }

    #[test]
    fn test_malformed_argument() {
        assert_eq!(
            check_headers(&schema(), &args(&["X-Account 42"])).unwrap_err(),
            HeaderArgError::Malformed("X-Account 42".into())
        );
        assert_eq!(
            parse_header_arg("Bad Name: 1").unwrap_err(),
            HeaderArgError::InvalidName("Bad Name".into())
        );
        assert_eq!(
            parse_header_arg("X-Line: a\nb").unwrap_err(),
            HeaderArgError::InvalidValue("X-Line".into())
        );
    }

    #[test]
    fn test_valid_headers() {
        let report = check_headers(
            &schema(),
            &args(&[
                "X-Request-Id: 123e4567-e89b-12d3-a456-426614174000",
                "x-account: 7",
            ]),
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({ "valid": true, "failures": [] })
        );
        assert!(report.valid);
    }

    #[test]
    fn test_failures_are_sorted() {
        let report = check_headers(&schema(), &args(&["X-Account: seven"])).unwrap();

        assert!(!report.valid);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "valid": false,
                "failures": [
                    { "header": "X-Account", "reason": "invalid" },
                    { "header": "X-Request-Id", "reason": "missing" }
                ]
            })
        );
    }
}
