use crate::{
    error::{AppError, AppResult},
    models::{admin_profile, AdminProfile, AdminProfileModel, User},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

pub struct AdminProfileService {
    db: DatabaseConnection,
}

pub struct NewAdminProfile {
    pub user_id: i32,
    pub admin_number: i32,
    pub facebook_main: Option<String>,
    pub facebook_backup: Option<String>,
    pub zalo: Option<String>,
    pub website: Option<String>,
    pub services: Option<serde_json::Value>,
    pub bank_accounts: Option<serde_json::Value>,
    pub insurance_fund: f64,
    pub is_public: bool,
}

pub struct AdminProfileUpdate {
    pub admin_number: Option<i32>,
    pub facebook_main: Option<String>,
    pub facebook_backup: Option<String>,
    pub zalo: Option<String>,
    pub website: Option<String>,
    pub services: Option<serde_json::Value>,
    pub bank_accounts: Option<serde_json::Value>,
    pub insurance_fund: Option<f64>,
    pub is_public: Option<bool>,
}

impl AdminProfileService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Publicly listed contact cards, ordered by member number.
    pub async fn list_public(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<AdminProfileModel>, u64)> {
        let paginator = AdminProfile::find()
            .filter(admin_profile::Column::IsPublic.eq(true))
            .order_by_asc(admin_profile::Column::AdminNumber)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let profiles = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((profiles, total))
    }

    pub async fn get_public_by_number(&self, admin_number: i32) -> AppResult<AdminProfileModel> {
        AdminProfile::find()
            .filter(admin_profile::Column::AdminNumber.eq(admin_number))
            .filter(admin_profile::Column::IsPublic.eq(true))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list_all(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<AdminProfileModel>, u64)> {
        let paginator = AdminProfile::find()
            .order_by_asc(admin_profile::Column::AdminNumber)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let profiles = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((profiles, total))
    }

    pub async fn create(&self, input: NewAdminProfile) -> AppResult<AdminProfileModel> {
        User::find_by_id(input.user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let taken = AdminProfile::find()
            .filter(
                Condition::any()
                    .add(admin_profile::Column::UserId.eq(input.user_id))
                    .add(admin_profile::Column::AdminNumber.eq(input.admin_number)),
            )
            .one(&self.db)
            .await?
            .is_some();
        if taken {
            return Err(AppError::Validation(
                "Admin profile already exists or admin number is taken".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let model = admin_profile::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(input.user_id),
            admin_number: sea_orm::ActiveValue::Set(input.admin_number),
            facebook_main: sea_orm::ActiveValue::Set(input.facebook_main),
            facebook_backup: sea_orm::ActiveValue::Set(input.facebook_backup),
            zalo: sea_orm::ActiveValue::Set(input.zalo),
            website: sea_orm::ActiveValue::Set(input.website),
            services: sea_orm::ActiveValue::Set(input.services),
            bank_accounts: sea_orm::ActiveValue::Set(input.bank_accounts),
            insurance_fund: sea_orm::ActiveValue::Set(input.insurance_fund),
            is_public: sea_orm::ActiveValue::Set(input.is_public),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        Ok(saved)
    }

    pub async fn update(
        &self,
        profile_id: i32,
        update: AdminProfileUpdate,
    ) -> AppResult<AdminProfileModel> {
        let existing = AdminProfile::find_by_id(profile_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(number) = update.admin_number {
            let taken = AdminProfile::find()
                .filter(admin_profile::Column::AdminNumber.eq(number))
                .filter(admin_profile::Column::Id.ne(profile_id))
                .one(&self.db)
                .await?
                .is_some();
            if taken {
                return Err(AppError::Validation(
                    "Admin number is taken".to_string(),
                ));
            }
        }

        let mut active: admin_profile::ActiveModel = existing.into();
        if let Some(number) = update.admin_number {
            active.admin_number = sea_orm::ActiveValue::Set(number);
        }
        if let Some(value) = update.facebook_main {
            active.facebook_main = sea_orm::ActiveValue::Set(Some(value));
        }
        if let Some(value) = update.facebook_backup {
            active.facebook_backup = sea_orm::ActiveValue::Set(Some(value));
        }
        if let Some(value) = update.zalo {
            active.zalo = sea_orm::ActiveValue::Set(Some(value));
        }
        if let Some(value) = update.website {
            active.website = sea_orm::ActiveValue::Set(Some(value));
        }
        if let Some(value) = update.services {
            active.services = sea_orm::ActiveValue::Set(Some(value));
        }
        if let Some(value) = update.bank_accounts {
            active.bank_accounts = sea_orm::ActiveValue::Set(Some(value));
        }
        if let Some(value) = update.insurance_fund {
            active.insurance_fund = sea_orm::ActiveValue::Set(value);
        }
        if let Some(value) = update.is_public {
            active.is_public = sea_orm::ActiveValue::Set(value);
        }

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn delete(&self, profile_id: i32) -> AppResult<()> {
        AdminProfile::find_by_id(profile_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        AdminProfile::delete_by_id(profile_id).exec(&self.db).await?;
        Ok(())
    }
}
