//! The header schema: header name → field rule.

use std::collections::HashMap;

use axum::http::HeaderName;

use crate::error::SchemaError;
use crate::validation::rule::{FieldKind, FieldRule};

/// A frozen set of header rules, shared read-only across requests.
///
/// Names are kept as declared. Lookup case-sensitivity depends on the
/// [`HeaderSource`](crate::validation::HeaderSource) the schema is run against.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: HashMap<String, FieldRule>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// A schema with no rules; every request passes.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, header: &str) -> Option<&FieldRule> {
        self.rules.get(header)
    }

    /// Rules in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Collects rules and checks them structurally before freezing.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    rules: Vec<(String, FieldRule)>,
}

impl SchemaBuilder {
    /// Add a rule. A later rule for the same name replaces the earlier one.
    pub fn field(mut self, header: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.push((header.into(), rule));
        self
    }

    /// Build the schema, rejecting invalid header names, inverted length
    /// bounds and unrecognized kinds.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut rules = HashMap::with_capacity(self.rules.len());

        for (header, rule) in self.rules {
            if HeaderName::from_bytes(header.as_bytes()).is_err() {
                return Err(SchemaError::InvalidHeaderName(header));
            }

            match rule.kind() {
                FieldKind::Text(Some(bounds)) if !bounds.is_well_formed() => {
                    return Err(SchemaError::InvertedBounds {
                        header,
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
                FieldKind::Unrecognized(kind) => {
                    return Err(SchemaError::UnrecognizedKind {
                        kind: kind.clone(),
                        header,
                    });
                }
                _ => {}
            }

            rules.insert(header, rule);
        }

        Ok(Schema { rules })
    }
}
