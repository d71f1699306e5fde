use axum::{Extension, Json, extract::State};

use cachette_types::api::SendMessageRequest;
use cachette_types::models::{Message, MessageKind, NewMessage};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::SessionUser;

/// Messages are global in this model; every authenticated user sees the
/// whole feed, ascending by creation order.
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(_session): Extension<SessionUser>,
) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(state.store.messages()?))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Message vide".to_string()));
    }

    let message = state.store.create_message(NewMessage {
        user_id: session.id,
        content: content.to_string(),
        kind: MessageKind::Text,
    })?;

    Ok(Json(message))
}
