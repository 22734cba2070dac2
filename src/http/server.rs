//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the demo handlers
//! - Wire up middleware (tracing, JSON transform)
//! - Bind server to listener and shut down on Ctrl+C

use axum::{
    extract::Request,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::middleware::{json_transform_middleware, JsonValue, Payload, TransformState};

/// Build the application router wrapped in the JSON transform middleware.
pub fn app(config: &AppConfig) -> Router {
    let state = TransformState::from_config(config);
    Router::new()
        .route("/echo", post(echo_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(state, json_transform_middleware))
        .layer(TraceLayer::new_for_http())
}

/// HTTP server for the JSON transform demo.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let router = app(&config);
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            transform_request = self.config.transform.transform_request,
            transform_response = self.config.transform.transform_response,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Echo the decoded payload back as the response value.
async fn echo_handler(request: Request) -> impl IntoResponse {
    match request.extensions().get::<Payload>() {
        Some(Payload(value)) => (StatusCode::OK, JsonValue(value.clone())).into_response(),
        None => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected an application/json request body",
        )
            .into_response(),
    }
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
