//! In-memory credential store for development and testing

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::auth::password::{hash_password, verify_password};
use crate::domain::{
    CreateUserDto, CreateUserOutcome, DomainError, DomainResult, StoredClaim, User, UserStore,
    ADMIN_ROLE, DEFAULT_ROLE,
};

/// In-memory credential store.
///
/// Satisfies the same contract as the relational store, including atomic
/// uniqueness enforcement and the creation-time password policy.
pub struct MemoryUserStore {
    users: DashMap<String, User>,
    roles: DashMap<String, ()>,
    memberships: DashMap<String, Vec<String>>,
    claims: DashMap<String, Vec<StoredClaim>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        let store = Self {
            users: DashMap::new(),
            roles: DashMap::new(),
            memberships: DashMap::new(),
            claims: DashMap::new(),
        };

        // Pre-existing role set, mirroring startup seeding
        store.roles.insert(DEFAULT_ROLE.to_string(), ());
        store.roles.insert(ADMIN_ROLE.to_string(), ());

        store
    }

    /// Define an additional role (the workflow never creates roles).
    pub fn define_role(&self, name: &str) {
        self.roles.insert(name.to_string(), ());
    }

    /// Attach a stored custom claim to a user.
    pub fn add_stored_claim(&self, user_id: &str, claim: StoredClaim) {
        self.claims.entry(user_id.to_string()).or_default().push(claim);
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_new_user(dto: &CreateUserDto) -> Vec<String> {
    let mut errors = Vec::new();
    if dto.username.len() < 3 || dto.username.len() > 50 {
        errors.push("Username must be 3-50 characters".to_string());
    }
    if !dto.email.contains('@') {
        errors.push("Invalid email address".to_string());
    }
    if dto.password.len() < 6 {
        errors.push("Password must be at least 6 characters".to_string());
    }
    errors
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<CreateUserOutcome> {
        let errors = validate_new_user(&dto);
        if !errors.is_empty() {
            return Ok(CreateUserOutcome::Rejected(errors));
        }

        // Uniqueness backstop, as the relational store's constraints provide
        let duplicate = self
            .users
            .iter()
            .any(|u| u.username == dto.username || u.email == dto.email);
        if duplicate {
            return Ok(CreateUserOutcome::Rejected(vec![
                "Username or email already exists".to_string(),
            ]));
        }

        let password_hash = hash_password(&dto.password)
            .map_err(|e| DomainError::Crypto(format!("Failed to hash password: {}", e)))?;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: dto.username,
            email: dto.email,
            password_hash,
            first_name: dto.first_name,
            last_name: dto.last_name,
            created_at: Utc::now(),
        };

        self.users.insert(user.id.clone(), user.clone());
        Ok(CreateUserOutcome::Created(user))
    }

    async fn verify_password(&self, user: &User, password: &str) -> DomainResult<bool> {
        Ok(verify_password(password, &user.password_hash).unwrap_or(false))
    }

    async fn role_exists(&self, role: &str) -> DomainResult<bool> {
        Ok(self.roles.contains_key(role))
    }

    async fn user_has_role(&self, user: &User, role: &str) -> DomainResult<bool> {
        Ok(self
            .memberships
            .get(&user.id)
            .map(|roles| roles.iter().any(|r| r == role))
            .unwrap_or(false))
    }

    async fn add_user_to_role(&self, user: &User, role: &str) -> DomainResult<()> {
        if !self.roles.contains_key(role) {
            return Err(DomainError::NotFound {
                entity: "Role",
                field: "name",
                value: role.to_string(),
            });
        }

        self.memberships
            .entry(user.id.clone())
            .or_default()
            .push(role.to_string());
        Ok(())
    }

    async fn roles_for_user(&self, user: &User) -> DomainResult<Vec<String>> {
        Ok(self
            .memberships
            .get(&user.id)
            .map(|roles| roles.value().clone())
            .unwrap_or_default())
    }

    async fn claims_for_user(&self, user: &User) -> DomainResult<Vec<StoredClaim>> {
        Ok(self
            .claims
            .get(&user.id)
            .map(|claims| claims.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(username: &str, email: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            email: email.to_string(),
            password: "password1".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryUserStore::new();
        let outcome = store.create_user(dto("alice", "alice@example.com")).await.unwrap();
        let user = match outcome {
            CreateUserOutcome::Created(u) => u,
            CreateUserOutcome::Rejected(errors) => panic!("rejected: {:?}", errors),
        };

        assert!(store.find_by_id(&user.id).await.unwrap().is_some());
        assert!(store.find_by_email("alice@example.com").await.unwrap().is_some());
        assert!(store.find_by_username("alice").await.unwrap().is_some());
        assert!(store.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_password_policy_rejection() {
        let store = MemoryUserStore::new();
        let mut bad = dto("bob", "bob@example.com");
        bad.password = "short".to_string();

        match store.create_user(bad).await.unwrap() {
            CreateUserOutcome::Rejected(errors) => {
                assert_eq!(errors, vec!["Password must be at least 6 characters"]);
            }
            CreateUserOutcome::Created(_) => panic!("expected rejection"),
        }
    }

    #[tokio::test]
    async fn test_role_membership() {
        let store = MemoryUserStore::new();
        let CreateUserOutcome::Created(user) =
            store.create_user(dto("carol", "carol@example.com")).await.unwrap()
        else {
            panic!("expected creation");
        };

        assert!(store.role_exists("User").await.unwrap());
        assert!(!store.role_exists("SuperAdmin").await.unwrap());

        assert!(!store.user_has_role(&user, "User").await.unwrap());
        store.add_user_to_role(&user, "User").await.unwrap();
        assert!(store.user_has_role(&user, "User").await.unwrap());
        assert_eq!(store.roles_for_user(&user).await.unwrap(), vec!["User"]);

        assert!(store.add_user_to_role(&user, "SuperAdmin").await.is_err());
    }
}
