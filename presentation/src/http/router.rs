//! Router construction.

use super::handlers;
use axum::Router;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{get, post};
use relay_application::RunTurnUseCase;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub run_turn: RunTurnUseCase,
}

impl AppState {
    pub fn new(run_turn: RunTurnUseCase) -> Self {
        Self { run_turn }
    }
}

/// HTTP-layer options.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// `*` or a single origin
    pub cors_allow_origin: String,
    pub request_timeout: Option<Duration>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors_allow_origin: "*".to_string(),
            request_timeout: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid CORS origin {0:?}")]
pub struct InvalidCorsOrigin(pub String);

fn build_cors(origin: &str) -> Result<CorsLayer, InvalidCorsOrigin> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origin == "*" {
        Ok(cors.allow_origin(Any))
    } else {
        let value = HeaderValue::from_str(origin)
            .map_err(|_| InvalidCorsOrigin(origin.to_string()))?;
        Ok(cors.allow_origin(value))
    }
}

pub fn router(state: AppState, options: &RouterOptions) -> Result<Router, InvalidCorsOrigin> {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/start", post(handlers::start))
        .route("/continue", post(handlers::continue_conversation))
        .route("/invoke", post(handlers::invoke))
        .with_state(state);

    if let Some(timeout) = options.request_timeout {
        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ));
    }

    Ok(router
        .layer(build_cors(&options.cors_allow_origin)?)
        .layer(TraceLayer::new_for_http()))
}
