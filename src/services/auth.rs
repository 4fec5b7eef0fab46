use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel, UserRole},
    utils::{encode_access_token, hash_password, verify_password},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter,
};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new user. Returns (user_model, access_token).
    pub async fn register(
        &self,
        username: &str,
        email: Option<&str>,
        phone: Option<&str>,
        password: &str,
        full_name: Option<&str>,
    ) -> AppResult<(UserModel, String)> {
        if self.identity_taken(username, email, phone).await? {
            return Err(AppError::Validation(
                "Username, email or phone already exists".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_user = user::ActiveModel {
            username: sea_orm::ActiveValue::Set(username.to_string()),
            email: sea_orm::ActiveValue::Set(email.map(|s| s.to_string())),
            phone: sea_orm::ActiveValue::Set(phone.map(|s| s.to_string())),
            password_hash: sea_orm::ActiveValue::Set(password_hash),
            role: sea_orm::ActiveValue::Set(UserRole::User),
            full_name: sea_orm::ActiveValue::Set(full_name.map(|s| s.to_string())),
            is_active: sea_orm::ActiveValue::Set(true),
            is_verified: sea_orm::ActiveValue::Set(false),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let user = new_user.insert(&self.db).await?;
        let token = encode_access_token(&user.id.to_string())?;

        Ok((user, token))
    }

    /// Login with username, email or phone. Returns (user_model, access_token).
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<(UserModel, String)> {
        let user = User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(identifier))
                    .add(user::Column::Email.eq(identifier))
                    .add(user::Column::Phone.eq(identifier)),
            )
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        if !user.is_active {
            return Err(AppError::Validation(
                "Account has been deactivated".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let user_id = user.id;
        let mut active: user::ActiveModel = user.into();
        active.last_login = sea_orm::ActiveValue::Set(Some(now));
        let user = active.update(&self.db).await?;

        let token = encode_access_token(&user_id.to_string())?;
        Ok((user, token))
    }

    pub async fn get_user_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn identity_taken(
        &self,
        username: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> AppResult<bool> {
        let mut cond = Condition::any().add(user::Column::Username.eq(username));
        if let Some(email) = email {
            cond = cond.add(user::Column::Email.eq(email));
        }
        if let Some(phone) = phone {
            cond = cond.add(user::Column::Phone.eq(phone));
        }

        let count = User::find().filter(cond).count(&self.db).await?;
        Ok(count > 0)
    }
}
