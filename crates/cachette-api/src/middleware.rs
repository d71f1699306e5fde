use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::{SESSION_COOKIE, SessionUser};

/// Resolve the session cookie to a user and stash the identity in request
/// extensions. Missing or unbound tokens fail closed.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(ApiError::unauthenticated)?;

    let user_id = state
        .sessions
        .user_id(&token)
        .ok_or_else(ApiError::unauthenticated)?;

    req.extensions_mut().insert(SessionUser { id: user_id });
    Ok(next.run(req).await)
}
