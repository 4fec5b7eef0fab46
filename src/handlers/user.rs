use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserResponse;
use crate::middleware::auth::{parse_user_id, require_moderator, AuthUser};
use crate::models::UserRole;
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::user::{AdminUserUpdate, ProfileUpdate, UserService};
use axum::{extract::Path, extract::Query, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub zalo_contact: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListUsersQuery {
    /// Filter by role
    pub role: Option<UserRole>,
    /// Filter by active flag
    pub is_active: Option<bool>,
    /// Page number
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminUpdateUserRequest {
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    pub full_name: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    security(("jwt_token" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "users"
)]
pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user_id = parse_user_id(&auth_user)?;

    let service = UserService::new(db);
    let user = service
        .update_profile(
            user_id,
            ProfileUpdate {
                full_name: payload.full_name,
                email: payload.email,
                phone: payload.phone,
                zalo_contact: payload.zalo_contact,
            },
        )
        .await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    security(("jwt_token" = [])),
    params(
        ("role" = Option<String>, Query, description = "Filter by role"),
        ("is_active" = Option<bool>, Query, description = "Filter by active flag"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "List of users", body = PaginatedResponse<UserResponse>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "users"
)]
pub async fn list_users(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<ListUsersQuery>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).min(100);

    let service = UserService::new(db);
    let (users, total) = service
        .list(params.role, params.is_active, page, per_page)
        .await?;
    let items = users.into_iter().map(UserResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let service = UserService::new(db);
    let user = service.get_by_id(id).await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/users/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = AdminUpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn admin_update_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let service = UserService::new(db);
    let user = service
        .admin_update(
            id,
            AdminUserUpdate {
                role: payload.role,
                is_active: payload.is_active,
                is_verified: payload.is_verified,
                full_name: payload.full_name,
            },
        )
        .await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = String),
        (status = 403, description = "Admin accounts cannot be deleted", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn delete_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let service = UserService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("User deleted successfully"))
}
