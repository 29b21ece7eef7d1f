//! Serde bodies for the compliance-engine REST endpoints.

use serde::{Deserialize, Serialize};

use crate::jobs::ExecutionStatus;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            kind: "LoginRequest",
            username,
            password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "Authorization")]
    pub authorization: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub job_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    pub execution_id: i64,
    #[serde(default)]
    pub job_id: Option<i64>,
    #[serde(default)]
    pub status: Option<ExecutionStatus>,
}

/// `GET /executions/{id}` body. Extra fields the engine returns
/// (start time, rows masked, ...) are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDetail {
    pub execution_id: i64,
    pub job_id: i64,
    pub status: ExecutionStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileJob {
    pub ruleset_id: i64,
}

/// Envelope shared by the paginated metadata endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub response_list: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    pub table_metadata_id: i64,
    pub table_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    pub column_name: String,
    pub data_type: String,
    pub column_length: i64,
    pub is_masked: bool,
    /// Absent until a masking algorithm has been assigned to the column.
    #[serde(default)]
    pub algorithm_name: Option<String>,
    pub is_profiler_writable: bool,
}
