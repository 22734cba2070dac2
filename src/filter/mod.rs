//! JSON transform filter.
//!
//! # Data Flow
//! ```text
//! RequestContext (headers, raw body under `http.input`)
//!     → content_type.rs (is it JSON?)
//!     → transform.rs (decode payload, call inner handler, encode body)
//!     → Response (status, headers, body)
//! ```
//!
//! # Design Decisions
//! - Header keys are looked up through an ordered candidate list, not a
//!   normalized header map
//! - Codec failures are returned, never swallowed
//! - Bodies that skip the transform are returned exactly as produced

pub mod content_type;
pub mod context;
pub mod error;
pub mod response;
pub mod transform;

pub use content_type::{json_content_type, lookup_header, CONTENT_TYPE_JSON};
pub use context::{ContextValue, RequestContext, INPUT_KEY, PAYLOAD_KEY};
pub use error::TransformError;
pub use response::{Headers, Response, ResponseBody};
pub use transform::{Handler, JsonTransform};
