//! Route handlers.

use super::dto::{ContinueRequest, QueryRequest, TurnResponse};
use super::error::ApiError;
use super::router::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use relay_application::RunTurnInput;
use relay_domain::{AuthorizationHeaderError, Query, parse_bearer_header};
use serde::de::DeserializeOwned;
use tracing::info;

/// Parse a JSON body; an empty body yields `None`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// `POST /start`: new conversation with the service-managed token.
pub async fn start(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TurnResponse>, ApiError> {
    let request: QueryRequest = parse_body(&body)?.unwrap_or_default();

    let output = state
        .run_turn
        .execute(RunTurnInput::service_managed(request.query))
        .await?;

    info!(conversation_id = %output.conversation_id, "Conversation started");
    Ok(Json(output.into()))
}

/// `POST /continue`: reply text only; empty body when either field is
/// missing.
pub async fn continue_conversation(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let request: ContinueRequest = parse_body(&body)?.unwrap_or_default();

    let message = state
        .run_turn
        .continue_conversation(request.query.as_deref(), request.conversation_id.as_deref())
        .await?;

    Ok(message.map(|m| m.into_string()).unwrap_or_default())
}

/// `POST /invoke`: new conversation with the caller's bearer token.
///
/// An absent or empty query is rejected before any agent client is built.
pub async fn invoke(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TurnResponse>, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthorizationHeaderError::Missing)?;
    let header_value = header_value
        .to_str()
        .map_err(|_| AuthorizationHeaderError::Malformed)?;
    let token = parse_bearer_header(header_value)?;

    let request: QueryRequest = parse_body(&body)?.ok_or(ApiError::EmptyBody)?;
    if Query::from_optional(request.query.as_deref()).is_none() {
        return Err(ApiError::BadRequest("Query is empty".to_string()));
    }

    let output = state
        .run_turn
        .execute(RunTurnInput::with_caller_token(request.query, token))
        .await?;

    info!(conversation_id = %output.conversation_id, "Conversation invoked with caller token");
    Ok(Json(output.into()))
}
