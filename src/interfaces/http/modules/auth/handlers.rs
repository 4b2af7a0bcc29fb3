//! Authentication API handlers
//!
//! Workflow rejections (duplicate email/username, bad credentials, password
//! policy) are data: they come back as a 200 with `is_authenticated = false`
//! and the message inside the payload. Only store/infrastructure failures
//! map to error statuses.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{AuthResponse, RegisterRequest, TokenRequest, UserInfo};
use crate::application::AuthService;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth handler state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub auth_service: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration processed; check is_authenticated", body = ApiResponse<AuthResponse>),
        (status = 422, description = "Malformed request body"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, (StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let result = state
        .auth_service
        .register(request.into())
        .await
        .map_err(internal_error)?;

    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/token",
    tag = "Authentication",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Login processed; check is_authenticated", body = ApiResponse<AuthResponse>),
        (status = 500, description = "Store failure")
    )
)]
pub async fn token(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<TokenRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, (StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let result = state
        .auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(internal_error)?;

    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current principal", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    user: Option<axum::Extension<AuthenticatedUser>>,
) -> Result<Json<ApiResponse<UserInfo>>, (StatusCode, Json<ApiResponse<UserInfo>>)> {
    let Some(user) = user else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Not authenticated")),
        ));
    };

    let info = UserInfo {
        id: user.user_id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        roles: user.roles.clone(),
    };

    Ok(Json(ApiResponse::success(info)))
}

fn internal_error<T>(
    e: crate::domain::DomainError,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}
