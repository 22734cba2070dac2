//! JSON request/response transform middleware.
//!
//! The [`filter`] module holds the framework-independent filter; [`http`]
//! applies the same rules as axum middleware.

pub mod config;
pub mod filter;
pub mod http;
pub mod observability;

pub use config::{AppConfig, TransformConfig};
pub use filter::{Handler, JsonTransform, RequestContext, Response, ResponseBody, TransformError};
pub use http::HttpServer;
