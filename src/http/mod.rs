//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → middleware/ (trace, CORS, panic recovery, header validation)
//!     → handler, or response.rs (400 / 500 JSON error)
//!     → Send to client
//! ```

pub mod middleware;
pub mod response;
pub mod server;

pub use response::ErrorResponse;
pub use server::GuardServer;
