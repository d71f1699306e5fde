use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow, bail};
use cachette_types::models::{Call, Message, NewCall, NewMessage, NewUser, User};
use chrono::Utc;

use crate::Store;

/// Map-backed store. One mutex guards all collections and their id counters,
/// so concurrent creates interleave by arrival order and ids never collide.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    users: BTreeMap<i64, User>,
    messages: BTreeMap<i64, Message>,
    calls: BTreeMap<i64, Call>,
    next_user_id: i64,
    next_message_id: i64,
    next_call_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                users: BTreeMap::new(),
                messages: BTreeMap::new(),
                calls: BTreeMap::new(),
                next_user_id: 1,
                next_message_id: 1,
                next_call_id: 1,
            }),
        }
    }

    fn with_inner<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Inner) -> Result<T>,
    {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| anyhow!("store lock poisoned: {e}"))?;
        f(&mut inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn user(&self, id: i64) -> Result<Option<User>> {
        self.with_inner(|inner| Ok(inner.users.get(&id).cloned()))
    }

    fn user_by_access_code(&self, code: &str) -> Result<Option<User>> {
        self.with_inner(|inner| {
            Ok(inner
                .users
                .values()
                .find(|u| u.is_active && u.access_code == code)
                .cloned())
        })
    }

    fn create_user(&self, user: NewUser) -> Result<User> {
        self.with_inner(|inner| {
            if inner.users.values().any(|u| u.username == user.username) {
                bail!("username '{}' already taken", user.username);
            }
            if inner.users.values().any(|u| u.access_code == user.access_code) {
                bail!("access code already in use");
            }

            let id = inner.next_user_id;
            inner.next_user_id += 1;

            let user = User {
                id,
                username: user.username,
                access_code: user.access_code,
                is_active: true,
                avatar: user.avatar,
                phone: user.phone,
                status: user.status.or_else(|| Some("En ligne".to_string())),
            };
            inner.users.insert(id, user.clone());
            Ok(user)
        })
    }

    fn users(&self) -> Result<Vec<User>> {
        self.with_inner(|inner| Ok(inner.users.values().cloned().collect()))
    }

    fn messages(&self) -> Result<Vec<Message>> {
        // BTreeMap iterates in key order, which is creation order.
        self.with_inner(|inner| Ok(inner.messages.values().cloned().collect()))
    }

    fn create_message(&self, message: NewMessage) -> Result<Message> {
        self.with_inner(|inner| {
            let id = inner.next_message_id;
            inner.next_message_id += 1;

            let message = Message {
                id,
                user_id: message.user_id,
                content: message.content,
                kind: message.kind,
                timestamp: Utc::now(),
                is_read: false,
            };
            inner.messages.insert(id, message.clone());
            Ok(message)
        })
    }

    fn calls_for(&self, user_id: i64) -> Result<Vec<Call>> {
        self.with_inner(|inner| {
            let mut calls: Vec<Call> = inner
                .calls
                .values()
                .filter(|c| c.caller_id == user_id || c.receiver_id == user_id)
                .cloned()
                .collect();
            calls.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
            Ok(calls)
        })
    }

    fn create_call(&self, call: NewCall) -> Result<Call> {
        self.with_inner(|inner| {
            let id = inner.next_call_id;
            inner.next_call_id += 1;

            let call = Call {
                id,
                caller_id: call.caller_id,
                receiver_id: call.receiver_id,
                kind: call.kind,
                status: call.status,
                duration: call.duration,
                timestamp: Utc::now(),
            };
            inner.calls.insert(id, call.clone());
            Ok(call)
        })
    }
}
