use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel, UserRole},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

pub struct UserService {
    db: DatabaseConnection,
}

pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub zalo_contact: Option<String>,
}

pub struct AdminUserUpdate {
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    pub full_name: Option<String>,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Self-service profile update; only provided fields change.
    pub async fn update_profile(&self, user_id: i32, update: ProfileUpdate) -> AppResult<UserModel> {
        let existing = self.get_by_id(user_id).await?;
        let now = chrono::Utc::now().naive_utc();

        let mut active: user::ActiveModel = existing.into();
        if let Some(full_name) = update.full_name {
            active.full_name = sea_orm::ActiveValue::Set(Some(full_name));
        }
        if let Some(email) = update.email {
            active.email = sea_orm::ActiveValue::Set(Some(email));
        }
        if let Some(phone) = update.phone {
            active.phone = sea_orm::ActiveValue::Set(Some(phone));
        }
        if let Some(zalo) = update.zalo_contact {
            active.zalo_contact = sea_orm::ActiveValue::Set(Some(zalo));
        }
        active.updated_at = sea_orm::ActiveValue::Set(Some(now));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Update only the avatar URL (used by upload handler).
    pub async fn update_avatar_url(&self, user_id: i32, url: &str) -> AppResult<UserModel> {
        let existing = self.get_by_id(user_id).await?;
        let now = chrono::Utc::now().naive_utc();

        let mut active: user::ActiveModel = existing.into();
        active.avatar_url = sea_orm::ActiveValue::Set(Some(url.to_string()));
        active.updated_at = sea_orm::ActiveValue::Set(Some(now));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn list(
        &self,
        role: Option<UserRole>,
        is_active: Option<bool>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<UserModel>, u64)> {
        let mut query = User::find();

        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role));
        }
        if let Some(is_active) = is_active {
            query = query.filter(user::Column::IsActive.eq(is_active));
        }

        let paginator = query
            .order_by_desc(user::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((users, total))
    }

    pub async fn admin_update(&self, user_id: i32, update: AdminUserUpdate) -> AppResult<UserModel> {
        let existing = self.get_by_id(user_id).await?;
        let now = chrono::Utc::now().naive_utc();

        let mut active: user::ActiveModel = existing.into();
        if let Some(role) = update.role {
            active.role = sea_orm::ActiveValue::Set(role);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = sea_orm::ActiveValue::Set(is_active);
        }
        if let Some(is_verified) = update.is_verified {
            active.is_verified = sea_orm::ActiveValue::Set(is_verified);
        }
        if let Some(full_name) = update.full_name {
            active.full_name = sea_orm::ActiveValue::Set(Some(full_name));
        }
        active.updated_at = sea_orm::ActiveValue::Set(Some(now));

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Remove a user account. Admin accounts cannot be deleted.
    pub async fn delete(&self, user_id: i32) -> AppResult<()> {
        let existing = self.get_by_id(user_id).await?;

        if existing.role == UserRole::Admin {
            return Err(AppError::Forbidden);
        }

        User::delete_by_id(user_id).exec(&self.db).await?;
        Ok(())
    }
}
