//! Bearer-token authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::common::ApiResponse;
use crate::auth::token::{verify_token, AccessClaims, TokenSettings};
use crate::domain::ADMIN_ROLE;

/// Authentication state for the middleware
#[derive(Clone)]
pub struct AuthState {
    pub token_settings: TokenSettings,
}

/// Authenticated principal extracted from a verified bearer token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.uid,
            username: claims.sub,
            email: claims.email,
            roles: claims.roles,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Bearer-token authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return unauthorized("Missing authentication token");
    };

    let Some(token) = extract_token(&auth_header) else {
        return unauthorized("Invalid authentication token");
    };

    match verify_token(token, &auth_state.token_settings) {
        Ok(claims) => {
            let user = AuthenticatedUser::from_claims(claims);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) => unauthorized("Invalid authentication token"),
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: Vec<&str>) -> AccessClaims {
        AccessClaims {
            sub: "alice".to_string(),
            jti: "jti-1".to_string(),
            email: "alice@example.com".to_string(),
            uid: "user-123".to_string(),
            iss: "idgate".to_string(),
            aud: "idgate-clients".to_string(),
            iat: 0,
            exp: i64::MAX,
            roles: roles.into_iter().map(String::from).collect(),
            custom: Default::default(),
        }
    }

    #[test]
    fn test_principal_from_claims() {
        let user = AuthenticatedUser::from_claims(claims(vec!["User", "Admin"]));
        assert_eq!(user.user_id, "user-123");
        assert_eq!(user.username, "alice");
        assert!(user.is_admin());

        let user = AuthenticatedUser::from_claims(claims(vec!["User"]));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("Basic dXNlcg=="), None);
    }
}
