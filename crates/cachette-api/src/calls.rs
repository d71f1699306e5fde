use axum::{Extension, Json, extract::State};

use cachette_types::api::CreateCallRequest;
use cachette_types::models::{Call, NewCall};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::SessionUser;

/// Call history scoped to the caller: only calls where they are initiator
/// or recipient, most recent first.
pub async fn get_calls(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> Result<Json<Vec<Call>>, ApiError> {
    Ok(Json(state.store.calls_for(session.id)?))
}

/// Record a completed call. The session user is always the caller side.
pub async fn create_call(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Json(req): Json<CreateCallRequest>,
) -> Result<Json<Call>, ApiError> {
    if state.store.user(req.receiver_id)?.is_none() {
        return Err(ApiError::user_not_found());
    }

    let call = state.store.create_call(NewCall {
        caller_id: session.id,
        receiver_id: req.receiver_id,
        kind: req.kind,
        status: req.status,
        duration: req.duration.unwrap_or(0),
    })?;

    Ok(Json(call))
}
