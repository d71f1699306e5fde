use axum::{Extension, Json, extract::State};

use cachette_types::models::User;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::SessionUser;

/// Contact list: every active user except the caller. Access codes are
/// stripped at the serialization layer.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .store
        .users()?
        .into_iter()
        .filter(|u| u.id != session.id && u.is_active)
        .collect();

    Ok(Json(users))
}
