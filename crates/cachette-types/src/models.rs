use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Shared secret checked by exact match at login. Never serialized.
    #[serde(skip_serializing, default)]
    pub access_code: String,
    pub is_active: bool,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: i64,
    pub caller_id: i64,
    pub receiver_id: i64,
    #[serde(rename = "type")]
    pub kind: CallKind,
    pub status: CallStatus,
    /// Seconds. Zero for missed calls.
    pub duration: i64,
    pub timestamp: DateTime<Utc>,
}

/// A per-counterpart conversation summary, recomputed from the raw records on
/// every read. Not a stored entity: `id` is the participant's user id, and
/// the pinned/archived flags exist only so the wire shape matches the schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: i64,
    pub participant: User,
    pub last_message: Message,
    pub unread_count: usize,
    pub timestamp: DateTime<Utc>,
    pub is_pinned: bool,
    pub is_archived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Voice,
    Video,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Voice => "voice",
            MessageKind::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(MessageKind::Text),
            "image" => Some(MessageKind::Image),
            "voice" => Some(MessageKind::Voice),
            "video" => Some(MessageKind::Video),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Voice,
    Video,
}

impl CallKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CallKind::Voice => "voice",
            CallKind::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "voice" => Some(CallKind::Voice),
            "video" => Some(CallKind::Video),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Incoming,
    Outgoing,
    Missed,
}

impl CallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CallStatus::Incoming => "incoming",
            CallStatus::Outgoing => "outgoing",
            CallStatus::Missed => "missed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "incoming" => Some(CallStatus::Incoming),
            "outgoing" => Some(CallStatus::Outgoing),
            "missed" => Some(CallStatus::Missed),
            _ => None,
        }
    }
}

// -- Insert types --
//
// What a caller provides at creation; the store stamps id, timestamp and
// default flags.

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub access_code: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub user_id: i64,
    pub content: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone)]
pub struct NewCall {
    pub caller_id: i64,
    pub receiver_id: i64,
    pub kind: CallKind,
    pub status: CallStatus,
    pub duration: i64,
}
