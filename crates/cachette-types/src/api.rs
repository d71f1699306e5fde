use serde::{Deserialize, Serialize};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

/// Display-safe projection returned by login and `/api/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub content: String,
}

// -- Calls --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCallRequest {
    pub receiver_id: i64,
    #[serde(rename = "type")]
    pub kind: crate::models::CallKind,
    pub status: crate::models::CallStatus,
    pub duration: Option<i64>,
}

// -- Calculator gate --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculateRequest {
    pub expression: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub result: f64,
    pub display: String,
}
