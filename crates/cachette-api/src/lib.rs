pub mod auth;
pub mod calc;
pub mod calls;
pub mod discussions;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod session;
pub mod users;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::auth::AppState;

/// Full HTTP surface. Transport-level layers (CORS, tracing) are the
/// server's concern and go on top of this.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/calculate", post(calc::calculate))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/api/user", get(auth::current_user))
        .route("/api/users", get(users::list_users))
        .route("/api/messages", get(messages::get_messages).post(messages::send_message))
        .route("/api/calls", get(calls::get_calls).post(calls::create_call))
        .route("/api/discussions", get(discussions::get_discussions))
        .layer(from_fn_with_state(state.clone(), middleware::require_session))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}
