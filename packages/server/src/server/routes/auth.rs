use axum::{extract::Extension, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::auth::{self, AdminUser};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AdminUser,
}

pub async fn login_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    let success = auth::login(&body.email, &body.password, &state.deps).await?;
    Ok(Json(LoginResponse {
        token: success.token,
        expires_at: success.expires_at,
        user: success.user,
    }))
}

pub async fn logout_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> ApiResult<StatusCode> {
    auth::logout(&user.token, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}
