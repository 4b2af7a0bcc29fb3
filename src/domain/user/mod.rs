//! User aggregate
//!
//! Contains the User entity, role/claim value types, the registration DTO,
//! the ephemeral authentication result, and the credential store interface.

pub mod model;
pub mod store;

pub use model::{AuthResult, CreateUserDto, CreateUserOutcome, StoredClaim, User};
pub use store::UserStore;

/// Role granted to every newly registered user.
pub const DEFAULT_ROLE: &str = "User";

/// Role required to assign roles to other users.
pub const ADMIN_ROLE: &str = "Admin";
