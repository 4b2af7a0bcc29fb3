use async_trait::async_trait;

use super::{CreateUserDto, CreateUserOutcome, StoredClaim, User};
use crate::domain::DomainResult;

/// Credential store interface.
///
/// The subsystem of record for user identity, authentication secrets, role
/// memberships and persisted claims. Any backing store (relational,
/// in-memory for tests) satisfies it. Uniqueness of username/email must be
/// enforced atomically by the implementation; the workflow's pre-checks are
/// check-then-act and rely on that backstop.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Create a user record with a hashed credential. Validation rejections
    /// are returned as data in [`CreateUserOutcome::Rejected`].
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<CreateUserOutcome>;

    /// Verify a plaintext password against the user's stored credential.
    async fn verify_password(&self, user: &User, password: &str) -> DomainResult<bool>;

    async fn role_exists(&self, role: &str) -> DomainResult<bool>;
    async fn user_has_role(&self, user: &User, role: &str) -> DomainResult<bool>;
    async fn add_user_to_role(&self, user: &User, role: &str) -> DomainResult<()>;
    async fn roles_for_user(&self, user: &User) -> DomainResult<Vec<String>>;
    async fn claims_for_user(&self, user: &User) -> DomainResult<Vec<StoredClaim>>;
}
