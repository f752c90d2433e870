//! HTTP gateway
//!
//! Thin axum front end over [`RunTurnUseCase`](relay_application::RunTurnUseCase):
//! extracts query, conversation id and bearer token, runs the turn and
//! serializes the result.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use router::{AppState, InvalidCorsOrigin, RouterOptions, router};
