use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use cachette_store::Store;
use cachette_types::api::{LoginRequest, LoginResponse, LogoutResponse, UserSummary};

use crate::error::ApiError;
use crate::session::{SESSION_COOKIE, SessionStore, SessionUser};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
}

/// Validate the submitted code against active users and bind the caller's
/// session. The failure message stays generic on purpose: it must not reveal
/// which codes exist or how close a guess was.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let code = req.code.trim();
    if code.is_empty() {
        return Err(ApiError::Validation("Erreur de validation".to_string()));
    }

    let user = state
        .store
        .user_by_access_code(code)?
        .ok_or_else(|| ApiError::Unauthorized("Code incorrect".to_string()))?;

    let token = state.sessions.create(user.id);
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: "Accès autorisé".to_string(),
            user: Some(UserSummary {
                id: user.id,
                username: user.username,
            }),
        }),
    ))
}

/// Destroy the session unconditionally. Always reports success, with or
/// without a live session.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.revoke(cookie.value());
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Json(LogoutResponse { success: true }))
}

pub async fn current_user(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> Result<Json<UserSummary>, ApiError> {
    let user = state
        .store
        .user(session.id)?
        .ok_or_else(ApiError::user_not_found)?;

    Ok(Json(UserSummary {
        id: user.id,
        username: user.username,
    }))
}
