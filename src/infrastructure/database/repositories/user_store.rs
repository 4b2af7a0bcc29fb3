use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::auth::password::{hash_password, verify_password};
use crate::domain::{
    CreateUserDto, CreateUserOutcome, DomainError, DomainResult, StoredClaim, User, UserStore,
};
use crate::infrastructure::database::entities::{role, user, user_claim, user_role};

/// Relational credential store backed by sea-orm.
pub struct SeaOrmUserStore {
    db: DatabaseConnection,
}

impl SeaOrmUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_role(&self, name: &str) -> DomainResult<Option<role::Model>> {
        let model = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        created_at: model.created_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

/// Creation-time validation. The store is the credential verifier, so the
/// password policy lives here rather than in the workflow.
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

// ── Store implementation ────────────────────────────────────────

#[async_trait]
impl UserStore for SeaOrmUserStore {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<CreateUserOutcome> {
        let errors = validate_new_user(&dto);
        if !errors.is_empty() {
            return Ok(CreateUserOutcome::Rejected(errors));
        }

        let password_hash = hash_password(&dto.password)
            .map_err(|e| DomainError::Crypto(format!("Failed to hash password: {}", e)))?;

        let now = Utc::now();
        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(dto.username),
            email: Set(dto.email),
            password_hash: Set(password_hash),
            first_name: Set(dto.first_name),
            last_name: Set(dto.last_name),
            created_at: Set(now),
        };

        match new_user.insert(&self.db).await {
            Ok(model) => Ok(CreateUserOutcome::Created(user_model_to_domain(model))),
            // Unique-constraint backstop for the workflow's check-then-act
            // uniqueness pre-checks.
            Err(e) if is_unique_violation(&e) => Ok(CreateUserOutcome::Rejected(vec![
                "Username or email already exists".to_string(),
            ])),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn verify_password(&self, user: &User, password: &str) -> DomainResult<bool> {
        Ok(verify_password(password, &user.password_hash).unwrap_or(false))
    }

    async fn role_exists(&self, role: &str) -> DomainResult<bool> {
        Ok(self.find_role(role).await?.is_some())
    }

    async fn user_has_role(&self, user: &User, role: &str) -> DomainResult<bool> {
        let Some(role) = self.find_role(role).await? else {
            return Ok(false);
        };

        let membership = user_role::Entity::find_by_id((user.id.clone(), role.id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(membership.is_some())
    }

    async fn add_user_to_role(&self, user: &User, role: &str) -> DomainResult<()> {
        let Some(role) = self.find_role(role).await? else {
            return Err(DomainError::NotFound {
                entity: "Role",
                field: "name",
                value: role.to_string(),
            });
        };

        let membership = user_role::ActiveModel {
            user_id: Set(user.id.clone()),
            role_id: Set(role.id),
        };
        membership.insert(&self.db).await.map_err(db_err)?;

        Ok(())
    }

    async fn roles_for_user(&self, user: &User) -> DomainResult<Vec<String>> {
        let memberships = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(&user.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let role_ids: Vec<String> = memberships.into_iter().map(|m| m.role_id).collect();
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let roles = role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    async fn claims_for_user(&self, user: &User) -> DomainResult<Vec<StoredClaim>> {
        let claims = user_claim::Entity::find()
            .filter(user_claim::Column::UserId.eq(&user.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(claims
            .into_iter()
            .map(|c| StoredClaim {
                claim_type: c.claim_type,
                claim_value: c.claim_value,
            })
            .collect())
    }
}
