use axum::extract::State;
use axum::http::StatusCode;

use crate::error::{ApiError, ApiResult};
use crate::session::SessionId;
use crate::state::AppState;

/// DELETE /session - Drop the caller's document.
pub async fn delete_session(
    State(state): State<AppState>,
    session_id: SessionId,
) -> ApiResult<StatusCode> {
    match state.sessions.remove(&session_id) {
        Some(_) => {
            tracing::info!("Session {session_id} deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound(format!("Session {session_id} not found"))),
    }
}
