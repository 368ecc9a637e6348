//! HTTP guard middlewares: header validation, CORS and panic recovery.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────▶ TraceLayer ─▶ CORS ─▶ recovery ─▶ timeout ─▶ header validation ─▶ handler
//!                           │         │                        │
//!                           ▼         ▼                        ▼
//!                     preflight 200  500 JSON               400 JSON
//!
//!     config.toml ─▶ loader ─▶ config::validation ─▶ Schema ─▶ HeaderGuard (ArcSwap)
//!          ▲                                                       ▲
//!          └───────── config::watcher (notify) ───── reload ───────┘
//! ```
//!
//! The header validation engine can be used without the HTTP layer:
//!
//! ```
//! use std::collections::HashMap;
//! use http_guards::validation::{validate, FieldRule, Schema, ValidationFailure};
//!
//! let schema = Schema::builder()
//!     .field("X-Id", FieldRule::uuid().required())
//!     .build()
//!     .unwrap();
//!
//! let headers: HashMap<String, String> = HashMap::new();
//! let result = validate(&headers, &schema);
//! assert_eq!(result.failures(), &[ValidationFailure::missing("X-Id")]);
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod validation;

pub use config::GuardConfig;
pub use error::{ConfigError, HeaderArgError, SchemaError, ServeError};
pub use http::GuardServer;
pub use lifecycle::Shutdown;
