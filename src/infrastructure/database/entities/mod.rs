//! Database entities module

pub mod role;
pub mod user;
pub mod user_claim;
pub mod user_role;

pub use role::Entity as Role;
pub use user::Entity as User;
pub use user_claim::Entity as UserClaim;
pub use user_role::Entity as UserRole;
