//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::AuthService;
use crate::auth::token::TokenSettings;
use crate::infrastructure::SeedStatus;
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, health, roles};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::token,
        auth::me,
        // Roles
        roles::add_role,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            // Auth
            auth::RegisterRequest,
            auth::TokenRequest,
            auth::AuthResponse,
            auth::UserInfo,
            // Roles
            roles::AddRoleRequest,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User registration and bearer-token issuance"),
        (name = "Roles", description = "Role assignment for existing users"),
    ),
    info(
        title = "Idgate Identity API",
        version = "1.0.0",
        description = "REST API for user registration, authentication and role-scoped bearer tokens",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    db: DatabaseConnection,
    auth_service: Arc<AuthService>,
    token_settings: TokenSettings,
    seed_status: Arc<SeedStatus>,
) -> Router {
    let middleware_state = AuthState { token_settings };

    let auth_state = auth::AuthHandlerState {
        auth_service: auth_service.clone(),
    };

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/token", post(auth::token))
        .with_state(auth_state);

    // Protected routes: current principal + role assignment
    let me_routes = Router::new()
        .route("/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ));

    let role_routes = Router::new()
        .route("/roles", post(roles::add_role))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(roles::RoleHandlerState { auth_service });

    // Health route
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            seed_status,
            started_at: Arc::new(Instant::now()),
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .merge(health_routes)
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", me_routes)
        .nest("/api/v1/auth", role_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
