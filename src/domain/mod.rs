//! Core business entities, types and traits

pub mod user;

pub use user::{
    AuthResult, CreateUserDto, CreateUserOutcome, StoredClaim, User, UserStore, ADMIN_ROLE,
    DEFAULT_ROLE,
};

// Re-export error types for convenience
pub use crate::shared::types::errors::{DomainError, DomainResult};
