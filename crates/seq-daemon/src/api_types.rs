//! Request and response types for all seq-daemon HTTP endpoints.
//!
//! These types are `Serialize + Deserialize` so they can be JSON-encoded
//! by Axum and decoded by tests. No business logic lives here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Matches the `SeqError` variant name so clients can branch on it
    /// without parsing the message string.
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueRequest {
    pub prefix: String,
    pub client_id: String,
    pub generated_by: String,
    pub correlation_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueBatchRequest {
    pub prefix: String,
    pub count: u32,
    pub client_id: String,
    pub generated_by: String,
    pub correlation_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetRequest {
    pub set_to: i64,
    pub reason: String,
    pub admin_user: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub old: i64,
    pub new: i64,
    pub reset_id: uuid::Uuid,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateConfigRequest {
    pub padding_length: Option<u32>,
    pub format_template: Option<String>,
    pub reset_rule: Option<seq_schemas::ResetRule>,
    pub admin_user: String,
    #[serde(default)]
    pub create_if_missing: bool,
}
