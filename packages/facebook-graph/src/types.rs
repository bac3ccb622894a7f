use serde::{Deserialize, Serialize};

/// Envelope returned by `GET /debug_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct DebugTokenResponse {
    pub data: DebugTokenData,
}

/// Token metadata from the token-debug endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DebugTokenData {
    pub app_id: Option<String>,
    /// `USER`, `PAGE`, `APP`, ...
    #[serde(rename = "type")]
    pub token_type: Option<String>,
    #[serde(default)]
    pub is_valid: bool,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Unix seconds, `0` for tokens that never expire.
    pub expires_at: Option<i64>,
    pub user_id: Option<String>,
    pub profile_id: Option<String>,
}

/// `{"id": "..."}` style responses from upload and publish calls.
#[derive(Debug, Clone, Deserialize)]
pub struct IdResponse {
    pub id: String,
    /// Present on published photo uploads.
    pub post_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageTokenResponse {
    pub id: String,
    pub access_token: Option<String>,
}

/// A binary file to be sent as the `source` part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorBody {
    pub error: GraphErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<i64>,
    pub error_subcode: Option<i64>,
    pub fbtrace_id: Option<String>,
}
