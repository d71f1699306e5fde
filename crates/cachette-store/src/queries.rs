use anyhow::Result;
use cachette_types::models::{
    Call, CallKind, CallStatus, Message, MessageKind, NewCall, NewMessage, NewUser, User,
};
use chrono::Utc;
use rusqlite::{OptionalExtension, Row, params};

use crate::Store;
use crate::sqlite::SqliteStore;

impl Store for SqliteStore {
    fn user(&self, id: i64) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, access_code, is_active, avatar, phone, status
                 FROM users WHERE id = ?1",
            )?;
            Ok(stmt.query_row([id], user_from_row).optional()?)
        })
    }

    fn user_by_access_code(&self, code: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, access_code, is_active, avatar, phone, status
                 FROM users WHERE access_code = ?1 AND is_active = 1",
            )?;
            Ok(stmt.query_row([code], user_from_row).optional()?)
        })
    }

    fn create_user(&self, user: NewUser) -> Result<User> {
        self.with_conn(|conn| {
            let status = user.status.unwrap_or_else(|| "En ligne".to_string());
            conn.execute(
                "INSERT INTO users (username, access_code, is_active, avatar, phone, status)
                 VALUES (?1, ?2, 1, ?3, ?4, ?5)",
                params![user.username, user.access_code, user.avatar, user.phone, status],
            )?;
            let id = conn.last_insert_rowid();
            Ok(User {
                id,
                username: user.username,
                access_code: user.access_code,
                is_active: true,
                avatar: user.avatar,
                phone: user.phone,
                status: Some(status),
            })
        })
    }

    fn users(&self) -> Result<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, access_code, is_active, avatar, phone, status
                 FROM users ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn messages(&self) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, content, type, timestamp, is_read
                 FROM messages ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn create_message(&self, message: NewMessage) -> Result<Message> {
        self.with_conn(|conn| {
            let timestamp = Utc::now();
            conn.execute(
                "INSERT INTO messages (user_id, content, type, timestamp, is_read)
                 VALUES (?1, ?2, ?3, ?4, 0)",
                params![message.user_id, message.content, message.kind.as_str(), timestamp],
            )?;
            let id = conn.last_insert_rowid();
            Ok(Message {
                id,
                user_id: message.user_id,
                content: message.content,
                kind: message.kind,
                timestamp,
                is_read: false,
            })
        })
    }

    fn calls_for(&self, user_id: i64) -> Result<Vec<Call>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, caller_id, receiver_id, type, status, duration, timestamp
                 FROM calls
                 WHERE caller_id = ?1 OR receiver_id = ?1
                 ORDER BY timestamp DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([user_id], call_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn create_call(&self, call: NewCall) -> Result<Call> {
        self.with_conn(|conn| {
            let timestamp = Utc::now();
            conn.execute(
                "INSERT INTO calls (caller_id, receiver_id, type, status, duration, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    call.caller_id,
                    call.receiver_id,
                    call.kind.as_str(),
                    call.status.as_str(),
                    call.duration,
                    timestamp
                ],
            )?;
            let id = conn.last_insert_rowid();
            Ok(Call {
                id,
                caller_id: call.caller_id,
                receiver_id: call.receiver_id,
                kind: call.kind,
                status: call.status,
                duration: call.duration,
                timestamp,
            })
        })
    }
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        access_code: row.get(2)?,
        is_active: row.get(3)?,
        avatar: row.get(4)?,
        phone: row.get(5)?,
        status: row.get(6)?,
    })
}

fn message_from_row(row: &Row) -> rusqlite::Result<Message> {
    let kind: String = row.get(3)?;
    Ok(Message {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        kind: MessageKind::parse(&kind).ok_or_else(|| bad_text(3, &kind))?,
        timestamp: row.get(4)?,
        is_read: row.get(5)?,
    })
}

fn call_from_row(row: &Row) -> rusqlite::Result<Call> {
    let kind: String = row.get(3)?;
    let status: String = row.get(4)?;
    Ok(Call {
        id: row.get(0)?,
        caller_id: row.get(1)?,
        receiver_id: row.get(2)?,
        kind: CallKind::parse(&kind).ok_or_else(|| bad_text(3, &kind))?,
        status: CallStatus::parse(&status).ok_or_else(|| bad_text(4, &status))?,
        duration: row.get(5)?,
        timestamp: row.get(6)?,
    })
}

fn bad_text(idx: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unrecognized value '{value}'").into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, code: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            access_code: code.to_string(),
            avatar: None,
            phone: None,
            status: None,
        }
    }

    #[test]
    fn contract_matches_memory_backend() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = store.create_user(user("Augustin Rashidi", "1234")).unwrap();
        let b = store.create_user(user("Mariam Sow", "0000")).unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.status.as_deref(), Some("En ligne"));

        assert!(store.user_by_access_code("1234").unwrap().is_some());
        assert!(store.user_by_access_code("123").unwrap().is_none());

        let m = store
            .create_message(NewMessage {
                user_id: a.id,
                content: "Salut, comment ça va?".into(),
                kind: MessageKind::Text,
            })
            .unwrap();
        assert!(!m.is_read);

        let listed = store.messages().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, m.content);
        assert_eq!(listed[0].kind, MessageKind::Text);
        assert_eq!(listed[0].timestamp, m.timestamp);
    }

    #[test]
    fn unique_constraints_reject_duplicates() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_user(user("Mohamed", "2222")).unwrap();
        assert!(store.create_user(user("Mohamed", "9999")).is_err());
        assert!(store.create_user(user("Khalifa Bally", "2222")).is_err());
    }

    #[test]
    fn inactive_users_never_match_codes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let u = store.create_user(user("Messi Léo", "1111")).unwrap();
        store
            .with_conn(|conn| {
                conn.execute("UPDATE users SET is_active = 0 WHERE id = ?1", [u.id])?;
                Ok(())
            })
            .unwrap();
        assert!(store.user_by_access_code("1111").unwrap().is_none());
        // Direct id lookup still sees the record.
        assert!(!store.user(u.id).unwrap().unwrap().is_active);
    }

    #[test]
    fn calls_round_trip_and_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = store.create_user(user("Augustin Rashidi", "1234")).unwrap();
        let b = store.create_user(user("Issa Hôtel Baobab", "5678")).unwrap();

        store
            .create_call(NewCall {
                caller_id: a.id,
                receiver_id: b.id,
                kind: CallKind::Voice,
                status: CallStatus::Outgoing,
                duration: 125,
            })
            .unwrap();
        store
            .create_call(NewCall {
                caller_id: b.id,
                receiver_id: a.id,
                kind: CallKind::Video,
                status: CallStatus::Missed,
                duration: 0,
            })
            .unwrap();

        let calls = store.calls_for(a.id).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].kind, CallKind::Video);
        assert_eq!(calls[0].status, CallStatus::Missed);
        assert!(calls[0].id > calls[1].id);
    }
}
