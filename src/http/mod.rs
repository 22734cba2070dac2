//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing layer)
//!     → middleware/json_transform.rs (decode payload)
//!     → handler
//!     → middleware/json_transform.rs (encode body, set Content-Length)
//!     → Send to client
//! ```

pub mod middleware;
pub mod server;

pub use middleware::{JsonValue, Payload, TransformState};
pub use server::{app, HttpServer};
