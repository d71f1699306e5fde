use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Identity bound to a request after the session middleware has run.
#[derive(Debug, Clone, Copy)]
pub struct SessionUser {
    pub id: i64,
}

/// Process-wide token-to-user bindings. Established at login, cleared at
/// logout; there is no expiry in this variant, so logout is the only
/// teardown path.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, i64>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Bind a fresh opaque token to the user and return it.
    pub fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.lock().insert(token.clone(), user_id);
        token
    }

    pub fn user_id(&self, token: &str) -> Option<i64> {
        self.lock().get(token).copied()
    }

    /// Invalidate unconditionally. Returns whether the token was bound.
    pub fn revoke(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        // The map only holds copies, so a poisoned guard is still usable.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
