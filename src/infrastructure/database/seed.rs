//! Startup seeding of the role set and the default admin account
//!
//! A seeding failure does not abort startup: it is logged, recorded in
//! [`SeedStatus`], and surfaced through the health endpoint so operators can
//! observe a possibly-unseeded store without the process crashing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{error, info};

use crate::auth::password::hash_password;
use crate::config::AdminConfig;
use crate::domain::{DomainError, DomainResult, ADMIN_ROLE, DEFAULT_ROLE};
use crate::infrastructure::database::entities::{role, user, user_role};

/// Startup-health signal for the seeding step.
#[derive(Debug, Default)]
pub struct SeedStatus {
    degraded: AtomicBool,
}

impl SeedStatus {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn mark_degraded(&self) {
        self.degraded.store(true, Ordering::SeqCst);
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }
}

/// Seed the pre-existing role set and a default admin user, recording any
/// failure in `status` instead of propagating it.
pub async fn seed_identity_data(
    db: &DatabaseConnection,
    admin: &AdminConfig,
    status: &SeedStatus,
) {
    if let Err(e) = try_seed(db, admin).await {
        error!("Identity seeding failed: {}", e);
        status.mark_degraded();
    }
}

async fn try_seed(db: &DatabaseConnection, admin: &AdminConfig) -> DomainResult<()> {
    for name in [DEFAULT_ROLE, ADMIN_ROLE] {
        ensure_role(db, name).await?;
    }

    ensure_default_admin(db, admin).await
}

async fn ensure_role(db: &DatabaseConnection, name: &str) -> DomainResult<()> {
    let existing = role::Entity::find()
        .filter(role::Column::Name.eq(name))
        .one(db)
        .await?;

    if existing.is_none() {
        let new_role = role::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
        };
        new_role.insert(db).await?;
        info!("Seeded role: {}", name);
    }

    Ok(())
}

/// Create the default admin user if no user with the configured admin email
/// exists, granting it both the admin and default roles.
async fn ensure_default_admin(db: &DatabaseConnection, admin: &AdminConfig) -> DomainResult<()> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&admin.email))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    info!("Creating default admin user...");

    let password_hash = hash_password(&admin.password)
        .map_err(|e| DomainError::Crypto(format!("Failed to hash admin password: {}", e)))?;

    let admin_user = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        username: Set(admin.username.clone()),
        email: Set(admin.email.clone()),
        password_hash: Set(password_hash),
        first_name: Set(admin.first_name.clone()),
        last_name: Set(admin.last_name.clone()),
        created_at: Set(Utc::now()),
    };
    let admin_user = admin_user.insert(db).await?;

    for name in [ADMIN_ROLE, DEFAULT_ROLE] {
        let Some(role) = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(db)
            .await?
        else {
            return Err(DomainError::NotFound {
                entity: "Role",
                field: "name",
                value: name.to_string(),
            });
        };

        let membership = user_role::ActiveModel {
            user_id: Set(admin_user.id.clone()),
            role_id: Set(role.id),
        };
        membership.insert(db).await?;
    }

    info!("Default admin created: {}", admin.email);
    info!("Please change the admin password immediately!");

    Ok(())
}
