//! Shared, swappable schema handle used by the HTTP middleware.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::validation::engine::{validate, HeaderSource, ValidationResult};
use crate::validation::schema::Schema;

/// Publishes the current schema to request handlers.
///
/// Readers take a snapshot per request and never lock. `replace` swaps the
/// pointer atomically; requests already in flight finish against the schema
/// they loaded.
#[derive(Debug)]
pub struct HeaderGuard {
    schema: ArcSwap<Schema>,
}

impl HeaderGuard {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: ArcSwap::from_pointee(schema),
        }
    }

    /// Snapshot of the current schema.
    pub fn schema(&self) -> Arc<Schema> {
        self.schema.load_full()
    }

    /// Publish a new schema for subsequent requests.
    pub fn replace(&self, schema: Schema) {
        let rules = schema.len();
        self.schema.store(Arc::new(schema));
        tracing::info!(rules, "Header schema replaced");
    }

    /// Validate against the current schema.
    pub fn check<H>(&self, headers: &H) -> ValidationResult
    where
        H: HeaderSource + ?Sized,
    {
        let schema = self.schema.load();
        validate(headers, &schema)
    }
}

impl Default for HeaderGuard {
    fn default() -> Self {
        Self::new(Schema::empty())
    }
}
