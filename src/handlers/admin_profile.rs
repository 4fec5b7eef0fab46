use crate::error::{AppError, AppResult};
use crate::middleware::auth::{require_admin, require_moderator, AuthUser};
use crate::models::AdminProfileModel;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::admin_profile::{AdminProfileService, AdminProfileUpdate, NewAdminProfile};
use axum::{extract::Path, extract::Query, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAdminProfileRequest {
    /// User the card belongs to
    pub user_id: i32,
    /// Unique public member number
    pub admin_number: i32,
    pub facebook_main: Option<String>,
    pub facebook_backup: Option<String>,
    pub zalo: Option<String>,
    pub website: Option<String>,
    /// Offered services, free-form JSON
    pub services: Option<serde_json::Value>,
    /// Published bank accounts, free-form JSON
    pub bank_accounts: Option<serde_json::Value>,
    pub insurance_fund: Option<f64>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAdminProfileRequest {
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

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProfileResponse {
    pub id: i32,
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
    pub created_at: String,
}

impl From<AdminProfileModel> for AdminProfileResponse {
    fn from(p: AdminProfileModel) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            admin_number: p.admin_number,
            facebook_main: p.facebook_main,
            facebook_backup: p.facebook_backup,
            zalo: p.zalo,
            website: p.website,
            services: p.services,
            bank_accounts: p.bank_accounts,
            insurance_fund: p.insurance_fund,
            is_public: p.is_public,
            created_at: p.created_at.to_string(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admins",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Public admin cards by member number", body = PaginatedResponse<AdminProfileResponse>),
    ),
    tag = "admins"
)]
pub async fn list_admins(
    Extension(db): Extension<DatabaseConnection>,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, per_page) = params.clamped(20);

    let service = AdminProfileService::new(db);
    let (profiles, total) = service.list_public(page, per_page).await?;
    let items = profiles.into_iter().map(AdminProfileResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admins/{admin_number}",
    params(("admin_number" = i32, Path, description = "Public member number")),
    responses(
        (status = 200, description = "Admin card", body = AdminProfileResponse),
        (status = 404, description = "No public card with that number", body = AppError),
    ),
    tag = "admins"
)]
pub async fn get_admin_by_number(
    Extension(db): Extension<DatabaseConnection>,
    Path(admin_number): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = AdminProfileService::new(db);
    let profile = service.get_public_by_number(admin_number).await?;

    Ok(ApiResponse::ok(AdminProfileResponse::from(profile)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admins/profiles",
    security(("jwt_token" = [])),
    request_body = CreateAdminProfileRequest,
    responses(
        (status = 200, description = "Profile created", body = AdminProfileResponse),
        (status = 400, description = "Duplicate user or number", body = AppError),
        (status = 403, description = "Super admin only", body = AppError),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "admins"
)]
pub async fn create_admin_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateAdminProfileRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = AdminProfileService::new(db);
    let profile = service
        .create(NewAdminProfile {
            user_id: payload.user_id,
            admin_number: payload.admin_number,
            facebook_main: payload.facebook_main,
            facebook_backup: payload.facebook_backup,
            zalo: payload.zalo,
            website: payload.website,
            services: payload.services,
            bank_accounts: payload.bank_accounts,
            insurance_fund: payload.insurance_fund.unwrap_or(0.0),
            is_public: payload.is_public.unwrap_or(true),
        })
        .await?;

    Ok(ApiResponse::ok(AdminProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admins/profiles/all",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "All profiles, public or not", body = PaginatedResponse<AdminProfileResponse>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "admins"
)]
pub async fn list_all_admin_profiles(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let (page, per_page) = params.clamped(50);

    let service = AdminProfileService::new(db);
    let (profiles, total) = service.list_all(page, per_page).await?;
    let items = profiles.into_iter().map(AdminProfileResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admins/profiles/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Profile ID")),
    request_body = UpdateAdminProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = AdminProfileResponse),
        (status = 403, description = "Super admin only", body = AppError),
        (status = 404, description = "Profile not found", body = AppError),
    ),
    tag = "admins"
)]
pub async fn update_admin_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAdminProfileRequest>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = AdminProfileService::new(db);
    let profile = service
        .update(
            id,
            AdminProfileUpdate {
                admin_number: payload.admin_number,
                facebook_main: payload.facebook_main,
                facebook_backup: payload.facebook_backup,
                zalo: payload.zalo,
                website: payload.website,
                services: payload.services,
                bank_accounts: payload.bank_accounts,
                insurance_fund: payload.insurance_fund,
                is_public: payload.is_public,
            },
        )
        .await?;

    Ok(ApiResponse::ok(AdminProfileResponse::from(profile)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admins/profiles/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile deleted", body = String),
        (status = 403, description = "Super admin only", body = AppError),
        (status = 404, description = "Profile not found", body = AppError),
    ),
    tag = "admins"
)]
pub async fn delete_admin_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = AdminProfileService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("Admin profile deleted successfully"))
}
