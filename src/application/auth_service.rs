//! Registration, login and role-assignment workflows
//!
//! Each call is a short-lived request-scoped operation; the service holds no
//! locks and caches nothing. Validation conflicts, credential failures and
//! referential failures are reported as messages inside normal result
//! values; only store/infrastructure failures propagate as errors.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::auth::token::{issue_token, TokenSettings};
use crate::domain::{AuthResult, CreateUserDto, CreateUserOutcome, DomainResult, UserStore,
    DEFAULT_ROLE};

/// Orchestrates the auth workflows over a credential store.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    settings: TokenSettings,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, settings: TokenSettings) -> Self {
        Self { store, settings }
    }

    /// Register a new user and authenticate it in one step.
    ///
    /// Email uniqueness is checked before username uniqueness, and both
    /// checks complete before any store mutation.
    pub async fn register(&self, dto: CreateUserDto) -> DomainResult<AuthResult> {
        if self.store.find_by_email(&dto.email).await?.is_some() {
            debug!("Registration rejected, email taken: {}", dto.email);
            return Ok(AuthResult::failure("Email is already registered!"));
        }

        if self.store.find_by_username(&dto.username).await?.is_some() {
            debug!("Registration rejected, username taken: {}", dto.username);
            return Ok(AuthResult::failure("Username is already registered!"));
        }

        let user = match self.store.create_user(dto).await? {
            CreateUserOutcome::Created(user) => user,
            CreateUserOutcome::Rejected(errors) => {
                return Ok(AuthResult::failure(errors.join(",")));
            }
        };

        self.store.add_user_to_role(&user, DEFAULT_ROLE).await?;

        let roles = vec![DEFAULT_ROLE.to_string()];
        let custom = self.store.claims_for_user(&user).await?;
        let issued = issue_token(&user, &roles, &custom, &self.settings)?;

        info!("Registered user: {}", user.username);

        Ok(AuthResult {
            message: "Registration and authentication successful.".to_string(),
            is_authenticated: true,
            username: user.username,
            email: user.email,
            roles,
            token: Some(issued.token),
            expires_on: Some(issued.expires_on),
        })
    }

    /// Authenticate credentials and issue a token scoped to the user's
    /// current role memberships.
    ///
    /// Unknown email and wrong password yield the identical message, to
    /// avoid leaking which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.store.find_by_email(email).await? else {
            return Ok(AuthResult::failure("Email or Password is incorrect!"));
        };

        if !self.store.verify_password(&user, password).await? {
            return Ok(AuthResult::failure("Email or Password is incorrect!"));
        }

        let roles = self.store.roles_for_user(&user).await?;
        let custom = self.store.claims_for_user(&user).await?;
        let issued = issue_token(&user, &roles, &custom, &self.settings)?;

        Ok(AuthResult {
            message: String::new(),
            is_authenticated: true,
            username: user.username,
            email: user.email,
            roles,
            token: Some(issued.token),
            expires_on: Some(issued.expires_on),
        })
    }

    /// Grant a role to an existing user.
    ///
    /// Returns a message by convention: empty string means success. There is
    /// no remove-role operation; a granted role stays granted.
    pub async fn add_role(&self, user_id: &str, role: &str) -> DomainResult<String> {
        let user = self.store.find_by_id(user_id).await?;
        let role_known = self.store.role_exists(role).await?;

        let Some(user) = user else {
            return Ok("Invalid user ID or Role".to_string());
        };
        if !role_known {
            return Ok("Invalid user ID or Role".to_string());
        }

        if self.store.user_has_role(&user, role).await? {
            return Ok("User already assigned to this role".to_string());
        }

        match self.store.add_user_to_role(&user, role).await {
            Ok(()) => {
                info!("Granted role {} to user {}", role, user.username);
                Ok(String::new())
            }
            Err(e) => {
                error!("Role grant failed for user {}: {}", user.username, e);
                Ok("Something went wrong".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::verify_token;
    use crate::domain::StoredClaim;
    use crate::infrastructure::MemoryUserStore;

    fn test_settings() -> TokenSettings {
        TokenSettings {
            issuer: "idgate-test".to_string(),
            audience: "idgate-clients".to_string(),
            signing_key: "unit-test-signing-key-not-for-production".to_string(),
            duration_in_days: 1,
        }
    }

    fn service() -> (AuthService, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        (AuthService::new(store.clone(), test_settings()), store)
    }

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
    async fn test_register_success_grants_default_role() {
        let (service, _) = service();

        let result = service.register(dto("alice", "alice@example.com")).await.unwrap();

        assert!(result.is_authenticated);
        assert_eq!(result.message, "Registration and authentication successful.");
        assert_eq!(result.username, "alice");
        assert_eq!(result.email, "alice@example.com");
        assert_eq!(result.roles, vec!["User"]);
        assert!(result.token.is_some());
        assert!(result.expires_on.is_some());

        let claims = verify_token(&result.token.unwrap(), &test_settings()).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.roles, vec!["User"]);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_creates_no_record() {
        let (service, store) = service();

        service.register(dto("alice", "shared@example.com")).await.unwrap();
        let result = service.register(dto("bob", "shared@example.com")).await.unwrap();

        assert!(!result.is_authenticated);
        assert_eq!(result.message, "Email is already registered!");
        assert!(result.token.is_none());
        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let (service, _) = service();

        service.register(dto("alice", "alice@example.com")).await.unwrap();
        let result = service.register(dto("alice", "other@example.com")).await.unwrap();

        assert!(!result.is_authenticated);
        assert_eq!(result.message, "Username is already registered!");
    }

    #[tokio::test]
    async fn test_register_reports_validation_errors_comma_joined() {
        let (service, _) = service();

        let mut bad = dto("al", "not-an-email");
        bad.password = "short".to_string();
        let result = service.register(bad).await.unwrap();

        assert!(!result.is_authenticated);
        assert_eq!(
            result.message,
            "Username must be 3-50 characters,Invalid email address,\
             Password must be at least 6 characters"
        );
    }

    #[tokio::test]
    async fn test_login_failure_message_does_not_leak_cause() {
        let (service, _) = service();
        service.register(dto("alice", "alice@example.com")).await.unwrap();

        let wrong_password = service.login("alice@example.com", "nope").await.unwrap();
        let unknown_email = service.login("ghost@example.com", "password1").await.unwrap();

        assert!(!wrong_password.is_authenticated);
        assert!(!unknown_email.is_authenticated);
        assert_eq!(wrong_password.message, "Email or Password is incorrect!");
        assert_eq!(unknown_email.message, wrong_password.message);
        assert!(wrong_password.token.is_none());
    }

    #[tokio::test]
    async fn test_login_token_roles_match_membership() {
        let (service, _) = service();
        let registered = service.register(dto("alice", "alice@example.com")).await.unwrap();

        // Grant a second role between registration and login
        let user_id = {
            let claims = verify_token(&registered.token.unwrap(), &test_settings()).unwrap();
            claims.uid
        };
        assert_eq!(service.add_role(&user_id, "Admin").await.unwrap(), "");

        let result = service.login("alice@example.com", "password1").await.unwrap();
        assert!(result.is_authenticated);

        let claims = verify_token(&result.token.unwrap(), &test_settings()).unwrap();
        let mut roles = claims.roles.clone();
        roles.sort();
        assert_eq!(roles, vec!["Admin", "User"]);
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn test_login_embeds_stored_custom_claims() {
        let (service, store) = service();
        service.register(dto("alice", "alice@example.com")).await.unwrap();

        let user = store.find_by_username("alice").await.unwrap().unwrap();
        store.add_stored_claim(
            &user.id,
            StoredClaim {
                claim_type: "department".to_string(),
                claim_value: "engineering".to_string(),
            },
        );

        let result = service.login("alice@example.com", "password1").await.unwrap();
        let claims = verify_token(&result.token.unwrap(), &test_settings()).unwrap();
        assert_eq!(
            claims.custom.get("department").and_then(|v| v.as_str()),
            Some("engineering")
        );
    }

    #[tokio::test]
    async fn test_add_role_unknown_user_or_role() {
        let (service, store) = service();
        service.register(dto("alice", "alice@example.com")).await.unwrap();
        let user = store.find_by_username("alice").await.unwrap().unwrap();

        let msg = service.add_role("no-such-id", "Admin").await.unwrap();
        assert_eq!(msg, "Invalid user ID or Role");

        let msg = service.add_role(&user.id, "Ghost").await.unwrap();
        assert_eq!(msg, "Invalid user ID or Role");

        // Neither call mutated membership
        assert_eq!(store.roles_for_user(&user).await.unwrap(), vec!["User"]);
    }

    #[tokio::test]
    async fn test_add_role_is_granted_exactly_once() {
        let (service, store) = service();
        service.register(dto("alice", "alice@example.com")).await.unwrap();
        let user = store.find_by_username("alice").await.unwrap().unwrap();

        assert_eq!(service.add_role(&user.id, "Admin").await.unwrap(), "");
        assert_eq!(
            service.add_role(&user.id, "Admin").await.unwrap(),
            "User already assigned to this role"
        );

        let roles = store.roles_for_user(&user).await.unwrap();
        assert_eq!(roles.iter().filter(|r| *r == "Admin").count(), 1);
    }
}
