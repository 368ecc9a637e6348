//! Header validation subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     config.toml [headers.*] / SchemaBuilder
//!     → schema.rs (structural checks, freeze)
//!     → guard.rs (publish Arc<Schema>)
//!
//! Per request:
//!     HeaderMap
//!     → engine.rs (presence → custom check → type check, per rule)
//!     → ValidationResult (all failures, never short-circuits)
//!     → http middleware (forward, or 400 with the failure list)
//! ```
//!
//! # Design Decisions
//! - Failures are data, never control flow: the engine cannot fail
//! - Every rule is evaluated; failures are aggregated
//! - Rule order carries no meaning; presentation sorts by header name
//! - Unknown rule kinds and malformed bounds fail closed

pub mod checks;
pub mod engine;
pub mod guard;
pub mod rule;
pub mod schema;

pub use engine::{
    validate, FailureReason, HeaderLookup, HeaderSource, ValidationFailure, ValidationResult,
};
pub use guard::HeaderGuard;
pub use rule::{AllowListCheck, CustomCheck, FieldKind, FieldRule, LengthBounds, PatternCheck};
pub use schema::{Schema, SchemaBuilder};
