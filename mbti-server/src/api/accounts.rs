//! Account endpoints: register, login, profile

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use mbti_common::auth::{issue_token, Claims};
use mbti_common::db::{self, User};
use mbti_common::time;

use super::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/auth/register body
///
/// Fields are optional so a missing one is reported as 400 with a message
/// rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
}

fn required(field: Option<String>) -> Option<String> {
    field.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn session_token(state: &AppState, user: &User) -> ApiResult<String> {
    let claims = Claims::new(user.id, &user.username, time::now_millis());
    issue_token(&claims, &state.token_secret)
        .map_err(|e| mbti_common::Error::Internal(format!("Failed to sign token: {}", e)).into())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;

    let (Some(username), Some(email), Some(password)) = (
        required(req.username),
        required(req.email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Please provide username, email and password".to_string(),
        ));
    };

    let user = db::create_user(&state.db, &username, &email, &password).await?;
    let token = session_token(&state, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "User registered successfully",
            token,
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<SessionResponse>> {
    let Json(req) = payload?;

    let (Some(username), Some(password)) =
        (required(req.username), req.password.filter(|p| !p.is_empty()))
    else {
        return Err(ApiError::BadRequest(
            "Please provide username and password".to_string(),
        ));
    };

    let Some(user) = db::verify_credentials(&state.db, &username, &password).await? else {
        warn!("Failed login for '{}'", username);
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    info!(user_id = %user.id, "User '{}' logged in", user.username);
    let token = session_token(&state, &user)?;

    Ok(Json(SessionResponse {
        message: "Login successful",
        token,
        user,
    }))
}

/// GET /api/auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<Json<ProfileResponse>> {
    // A valid token can outlive its account
    let user = db::get_user(&state.db, caller.id).await.map_err(|e| match e {
        mbti_common::Error::NotFound(_) => ApiError::NotFound("User not found".to_string()),
        other => other.into(),
    })?;

    Ok(Json(ProfileResponse { user }))
}

/// DELETE /api/auth/profile
///
/// Removes the account and every result it owns.
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<StatusCode> {
    db::delete_user(&state.db, caller.id).await.map_err(|e| match e {
        mbti_common::Error::NotFound(_) => ApiError::NotFound("User not found".to_string()),
        other => other.into(),
    })?;

    Ok(StatusCode::NO_CONTENT)
}
