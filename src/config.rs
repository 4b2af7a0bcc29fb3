//! Configuration module
//!
//! Process-wide settings loaded once at startup from a TOML file. The loaded
//! value is immutable; sub-configs (token settings, database config) are
//! derived from it in `main` and passed explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::token::TokenSettings;
use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// Connection URL (SQLite by default, switchable to PostgreSQL)
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./idgate.db?mode=rwc".to_string(),
        }
    }
}

/// Token signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_duration_days: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "super-secret-key-change-in-production".to_string(),
            jwt_issuer: "idgate".to_string(),
            jwt_audience: "idgate-clients".to_string(),
            jwt_duration_days: 7,
        }
    }
}

/// Default admin account seeded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@idgate.local".to_string(),
            password: "ChangeMe123".to_string(),
            first_name: "Default".to_string(),
            last_name: "Admin".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "idgate=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Token settings derived from the security section
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            issuer: self.security.jwt_issuer.clone(),
            audience: self.security.jwt_audience.clone(),
            signing_key: self.security.jwt_secret.clone(),
            duration_in_days: self.security.jwt_duration_days,
        }
    }

    /// Database config derived from the database section
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
        }
    }
}

/// Default config file location (~/.config/idgate/config.toml)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("idgate")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.security.jwt_duration_days, 7);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [security]
            jwt_secret = "s3cret"
            jwt_issuer = "test-issuer"
            jwt_audience = "test-aud"
            jwt_duration_days = 30
            "#,
        )
        .unwrap();

        assert_eq!(cfg.security.jwt_duration_days, 30);
        assert_eq!(cfg.server.api_port, 8080);

        let settings = cfg.token_settings();
        assert_eq!(settings.issuer, "test-issuer");
        assert_eq!(settings.duration_in_days, 30);
    }
}
