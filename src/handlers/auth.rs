use crate::error::{AppError, AppResult};
use crate::middleware::auth::parse_user_id;
use crate::middleware::AuthUser;
use crate::models::{UserModel, UserRole};
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Username (3-100 characters)
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Email address
    #[validate(email)]
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Password (min 8 characters)
    #[validate(length(min = 8))]
    pub password: String,
    /// Must match password
    pub confirm_password: String,
    /// Display name
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username, email or phone
    pub username: String,
    /// User password
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// JWT access token
    pub token: String,
    /// User ID
    pub user_id: i32,
    /// Username
    pub username: String,
    /// User role
    pub role: UserRole,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub zalo_contact: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            role: user.role,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            zalo_contact: user.zalo_contact,
            is_active: user.is_active,
            is_verified: user.is_verified,
            created_at: user.created_at.to_string(),
            last_login: user.last_login.map(|t| t.to_string()),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error or duplicate identity", body = AppError),
    ),
    tag = "auth"
)]
pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    if payload.password != payload.confirm_password {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }

    let service = AuthService::new(db);
    let (user, token) = service
        .register(
            &payload.username,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            &payload.password,
            payload.full_name.as_deref(),
        )
        .await?;

    Ok(ApiResponse::with_message(
        AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
            role: user.role,
        },
        "Registration successful",
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Account deactivated", body = AppError),
        (status = 401, description = "Invalid credentials", body = AppError),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AuthService::new(db);
    let (user, token) = service.login(&payload.username, &payload.password).await?;

    Ok(ApiResponse::ok(AuthResponse {
        token,
        user_id: user.id,
        username: user.username,
        role: user.role,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Current user retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "auth"
)]
pub async fn get_current_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = AuthService::new(db);
    let user = service.get_user_by_id(user_id).await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}
