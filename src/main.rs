//!
//! Identity and token-issuance REST API.
//! Reads configuration from TOML file (~/.config/idgate/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use idgate::application::AuthService;
use idgate::config::AppConfig;
use idgate::domain::UserStore;
use idgate::infrastructure::database::migrator::Migrator;
use idgate::infrastructure::database::seed::{seed_identity_data, SeedStatus};
use idgate::{create_api_router, default_config_path, init_database, SeaOrmUserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("IDGATE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Idgate Identity Service...");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = app_cfg.database_config();
    info!("Database: {}", db_config.url);

    let token_settings = app_cfg.token_settings();
    info!(
        "Token issuer configured: iss={}, {}d validity",
        token_settings.issuer, token_settings.duration_in_days
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Seed role set and default admin; a failure degrades health
    // instead of aborting startup.
    let seed_status = SeedStatus::shared();
    seed_identity_data(&db, &app_cfg.admin, &seed_status).await;

    // ── Services ───────────────────────────────────────────────
    let store: Arc<dyn UserStore> = Arc::new(SeaOrmUserStore::new(db.clone()));
    let auth_service = Arc::new(AuthService::new(store, token_settings.clone()));

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(db.clone(), auth_service, token_settings, seed_status);

    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Idgate Identity Service shutdown complete");
    Ok(())
}
