//! Role assignment API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::AddRoleRequest;
use crate::application::AuthService;
use crate::interfaces::http::common::{ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Role handler state
#[derive(Clone)]
pub struct RoleHandlerState {
    pub auth_service: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/roles",
    tag = "Roles",
    security(("bearer_auth" = [])),
    request_body = AddRoleRequest,
    responses(
        (status = 200, description = "Role granted", body = ApiResponse<EmptyData>),
        (status = 400, description = "Unknown user/role or role already assigned"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn add_role(
    State(state): State<RoleHandlerState>,
    user: Option<axum::Extension<AuthenticatedUser>>,
    ValidatedJson(request): ValidatedJson<AddRoleRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, (StatusCode, Json<ApiResponse<EmptyData>>)> {
    let Some(user) = user else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Not authenticated")),
        ));
    };

    if !user.is_admin() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin role required")),
        ));
    }

    let message = state
        .auth_service
        .add_role(&request.user_id, &request.role)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        })?;

    // Empty message means success by workflow convention
    if message.is_empty() {
        Ok(Json(ApiResponse::success(EmptyData {})))
    } else {
        Err((StatusCode::BAD_REQUEST, Json(ApiResponse::error(message))))
    }
}
