//! # Idgate Identity Service
//!
//! Minimal identity and token-issuance API: registers users, authenticates
//! credentials, and issues signed bearer tokens carrying identity and role
//! claims.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core entities, value types and the credential store trait
//! - **application**: Registration, login and role-assignment workflows
//! - **auth**: Token issuance/verification and password hashing
//! - **infrastructure**: sea-orm database store, migrations, seeding, and an
//!   in-memory store for tests
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, MemoryUserStore, SeaOrmUserStore};

// Re-export API router
pub use interfaces::http::create_api_router;
