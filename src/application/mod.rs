//! Business logic and use cases

pub mod auth_service;

pub use auth_service::AuthService;
