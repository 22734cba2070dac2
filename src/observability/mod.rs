//! Observability subsystem.
//!
//! Structured logging through `tracing`; the filter and middleware emit
//! events at their decision points and `logging.rs` installs the subscriber.

pub mod logging;
