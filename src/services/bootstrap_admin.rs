use crate::error::AppResult;
use crate::models::{user, User, UserRole};
use crate::utils::hash_password;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::env;

#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl BootstrapAdminConfig {
    pub fn from_env() -> Option<Self> {
        let enabled = env::var("BOOTSTRAP_ADMIN_ENABLED")
            .ok()
            .map(|v| v.trim().to_ascii_lowercase())
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes" | "y" | "on"))
            .unwrap_or(false);

        if !enabled {
            return None;
        }

        Some(Self {
            username: env::var("BOOTSTRAP_ADMIN_USERNAME").ok()?,
            email: env::var("BOOTSTRAP_ADMIN_EMAIL").ok()?,
            password: env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?,
        })
    }
}

/// Startup admin provisioning:
/// - if any admin already exists, do nothing
/// - else if the configured email/username matches a user, promote them
/// - else create a fresh admin account
pub async fn ensure_bootstrap_admin(db: &DatabaseConnection) -> AppResult<()> {
    let Some(cfg) = BootstrapAdminConfig::from_env() else {
        return Ok(());
    };

    let admin_exists = User::find()
        .filter(user::Column::Role.eq(UserRole::Admin))
        .one(db)
        .await?
        .is_some();
    if admin_exists {
        return Ok(());
    }

    let existing = User::find()
        .filter(
            sea_orm::Condition::any()
                .add(user::Column::Email.eq(cfg.email.clone()))
                .add(user::Column::Username.eq(cfg.username.clone())),
        )
        .one(db)
        .await?;

    let now = chrono::Utc::now().naive_utc();

    if let Some(user) = existing {
        let mut active: user::ActiveModel = user.into();
        active.role = sea_orm::ActiveValue::Set(UserRole::Admin);
        active.updated_at = sea_orm::ActiveValue::Set(Some(now));
        active.update(db).await?;
        return Ok(());
    }

    let password_hash = hash_password(&cfg.password)?;

    let new_user = user::ActiveModel {
        username: sea_orm::ActiveValue::Set(cfg.username),
        email: sea_orm::ActiveValue::Set(Some(cfg.email)),
        password_hash: sea_orm::ActiveValue::Set(password_hash),
        role: sea_orm::ActiveValue::Set(UserRole::Admin),
        is_active: sea_orm::ActiveValue::Set(true),
        is_verified: sea_orm::ActiveValue::Set(true),
        created_at: sea_orm::ActiveValue::Set(now),
        ..Default::default()
    };

    new_user.insert(db).await?;
    Ok(())
}
