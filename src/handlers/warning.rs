use crate::error::{AppError, AppResult};
use crate::middleware::auth::{optional_user_id, parse_user_id, require_moderator, AuthUser};
use crate::models::{ScamCategory, UserModel, WarningModel, WarningStatus};
use crate::response::{ApiResponse, PaginatedResponse};
use crate::search::{SearchIndex, SearchType, StatsProviders, TopScammer, TopSearch};
use crate::services::auth::AuthService;
use crate::services::search::SearchService;
use crate::services::warning::{NewWarning, WarningService};
use crate::utils::mask_account;
use axum::extract::{ConnectInfo, Path, Query};
use axum::http::HeaderMap;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWarningRequest {
    /// Title (1-500 characters)
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    /// Name of the reported actor (1-255 characters)
    #[validate(length(min = 1, max = 255))]
    pub scammer_name: String,
    /// Bank account number
    pub bank_account: Option<String>,
    /// Bank name
    pub bank_name: Option<String>,
    /// Facebook profile link
    pub facebook_link: Option<String>,
    /// Description of the scam
    #[validate(length(min = 1))]
    pub content: String,
    /// Scam category (defaults to other)
    pub category: Option<ScamCategory>,
    /// Evidence image URLs from the upload endpoint
    pub evidence_images: Option<Vec<String>>,
    /// Reporter display name (defaults to profile name)
    pub reporter_name: Option<String>,
    /// Reporter Zalo contact (defaults to profile contact)
    pub reporter_zalo: Option<String>,
    /// Hide reporter identity on the public page
    pub is_anonymous: Option<bool>,
    /// Public nickname for anonymous reports
    pub reporter_nickname: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchWarningsQuery {
    /// Search keyword
    pub query: String,
    /// What the keyword is: phone, bank_account, facebook or name
    pub search_type: Option<SearchType>,
    /// Page number
    pub page: Option<u64>,
    /// Results per page (max 100)
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SuggestQuery {
    /// Prefix to complete
    pub query: String,
    /// Max suggestions
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListWarningsQuery {
    /// Filter by category
    pub category: Option<ScamCategory>,
    /// Page number
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminListWarningsQuery {
    /// Filter by status
    pub status: Option<WarningStatus>,
    /// Page number
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewWarningRequest {
    /// New status: approved or rejected
    pub status: Option<WarningStatus>,
    /// Reviewer note; overwrites any previous note
    pub review_note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopQuery {
    /// Trailing window in days
    pub days: Option<u32>,
    /// Max entries
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WarningResponse {
    pub id: i32,
    pub title: String,
    pub scammer_name: String,
    pub bank_account: Option<String>,
    pub bank_name: Option<String>,
    pub facebook_link: Option<String>,
    pub content: String,
    pub category: ScamCategory,
    pub evidence_images: Vec<String>,
    pub status: WarningStatus,
    pub view_count: i32,
    pub search_count: i32,
    pub warning_count: i32,
    pub credibility_score: u32,
    pub reporter_name: Option<String>,
    pub reporter_zalo: Option<String>,
    pub is_anonymous: bool,
    pub reporter_nickname: Option<String>,
    pub review_note: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub approved_at: Option<String>,
}

impl From<WarningModel> for WarningResponse {
    fn from(w: WarningModel) -> Self {
        let credibility_score = w.credibility_score();
        Self {
            id: w.id,
            title: w.title,
            scammer_name: w.scammer_name,
            bank_account: w.bank_account,
            bank_name: w.bank_name,
            facebook_link: w.facebook_link,
            content: w.content,
            category: w.category,
            evidence_images: w.evidence_images.0,
            status: w.status,
            view_count: w.view_count,
            search_count: w.search_count,
            warning_count: w.warning_count,
            credibility_score,
            reporter_name: w.reporter_name,
            reporter_zalo: w.reporter_zalo,
            is_anonymous: w.is_anonymous,
            reporter_nickname: w.reporter_nickname,
            review_note: w.review_note,
            created_at: w.created_at.to_string(),
            updated_at: w.updated_at.map(|t| t.to_string()),
            approved_at: w.approved_at.map(|t| t.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/warnings/search",
    params(
        ("query" = String, Query, description = "Search keyword"),
        ("search_type" = Option<String>, Query, description = "phone, bank_account, facebook or name"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("limit" = Option<u64>, Query, description = "Results per page (max 100)"),
    ),
    responses(
        (status = 200, description = "Ranked approved warnings", body = PaginatedResponse<WarningResponse>),
        (status = 400, description = "Empty query", body = AppError),
    ),
    tag = "warnings"
)]
pub async fn search_warnings(
    Extension(db): Extension<DatabaseConnection>,
    Extension(index): Extension<SearchIndex>,
    Extension(sync): Extension<crate::search::IndexSync>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(params): Query<SearchWarningsQuery>,
) -> AppResult<impl IntoResponse> {
    if params.query.trim().is_empty() {
        return Err(AppError::Validation("Query must not be empty".to_string()));
    }
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    // Logged-in searchers are attributed in the analytics log, anonymous
    // ones are not; neither outcome affects the search.
    let user_id = optional_user_id(&headers);

    let service = SearchService::new(db, index, sync);
    let result = service
        .search(
            params.query.trim(),
            params.search_type,
            page,
            limit,
            Some(addr.ip().to_string()),
            user_id,
        )
        .await?;

    let items: Vec<WarningResponse> = result
        .warnings
        .into_iter()
        .map(WarningResponse::from)
        .collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items,
        result.total,
        page,
        limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/warnings/search/suggest",
    params(
        ("query" = String, Query, description = "Prefix to complete"),
        ("limit" = Option<u64>, Query, description = "Max suggestions (max 50)"),
    ),
    responses(
        (status = 200, description = "Scammer name suggestions", body = SuggestResponse),
        (status = 400, description = "Empty query", body = AppError),
    ),
    tag = "warnings"
)]
pub async fn search_suggest(
    Extension(db): Extension<DatabaseConnection>,
    Extension(index): Extension<SearchIndex>,
    Extension(sync): Extension<crate::search::IndexSync>,
    Query(params): Query<SuggestQuery>,
) -> AppResult<impl IntoResponse> {
    if params.query.trim().is_empty() {
        return Err(AppError::Validation("Query must not be empty".to_string()));
    }
    let limit = params.limit.unwrap_or(10).clamp(1, 50);

    let service = SearchService::new(db, index, sync);
    let suggestions = service.suggest(params.query.trim(), limit).await?;

    Ok(ApiResponse::ok(SuggestResponse { suggestions }))
}

#[utoipa::path(
    get,
    path = "/api/v1/warnings",
    params(
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Approved warnings, newest first", body = PaginatedResponse<WarningResponse>),
    ),
    tag = "warnings"
)]
pub async fn list_warnings(
    Extension(db): Extension<DatabaseConnection>,
    Extension(sync): Extension<crate::search::IndexSync>,
    Query(params): Query<ListWarningsQuery>,
) -> AppResult<impl IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).min(100);

    let service = WarningService::new(db, sync);
    let (warnings, total) = service.list_public(params.category, page, per_page).await?;
    let items = warnings.into_iter().map(WarningResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/warnings/{id}",
    params(("id" = i32, Path, description = "Warning ID")),
    responses(
        (status = 200, description = "Warning details", body = WarningResponse),
        (status = 404, description = "Not found or not approved", body = AppError),
    ),
    tag = "warnings"
)]
pub async fn get_warning(
    Extension(db): Extension<DatabaseConnection>,
    Extension(sync): Extension<crate::search::IndexSync>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = WarningService::new(db, sync);
    let warning = service.get_public(id).await?;

    Ok(ApiResponse::ok(WarningResponse::from(warning)))
}

#[utoipa::path(
    post,
    path = "/api/v1/warnings",
    security(("jwt_token" = [])),
    request_body = CreateWarningRequest,
    responses(
        (status = 200, description = "Warning submitted for review", body = WarningResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "warnings"
)]
pub async fn create_warning(
    Extension(db): Extension<DatabaseConnection>,
    Extension(sync): Extension<crate::search::IndexSync>,
    auth_user: AuthUser,
    Json(payload): Json<CreateWarningRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let reporter = current_user(&db, &auth_user).await?;

    let service = WarningService::new(db, sync);
    let warning = service
        .create(
            &reporter,
            NewWarning {
                title: payload.title,
                scammer_name: payload.scammer_name,
                bank_account: payload.bank_account,
                bank_name: payload.bank_name,
                facebook_link: payload.facebook_link,
                content: payload.content,
                category: payload.category.unwrap_or(ScamCategory::Other),
                evidence_images: payload.evidence_images.unwrap_or_default(),
                reporter_name: payload.reporter_name,
                reporter_zalo: payload.reporter_zalo,
                is_anonymous: payload.is_anonymous.unwrap_or(false),
                reporter_nickname: payload.reporter_nickname,
            },
        )
        .await?;

    Ok(ApiResponse::ok(WarningResponse::from(warning)))
}

#[utoipa::path(
    get,
    path = "/api/v1/warnings/me",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Own submissions, any status", body = PaginatedResponse<WarningResponse>),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "warnings"
)]
pub async fn my_warnings(
    Extension(db): Extension<DatabaseConnection>,
    Extension(sync): Extension<crate::search::IndexSync>,
    auth_user: AuthUser,
    Query(params): Query<crate::response::PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let (page, per_page) = params.clamped(20);

    let service = WarningService::new(db, sync);
    let (warnings, total) = service.list_by_reporter(user_id, page, per_page).await?;
    let items = warnings.into_iter().map(WarningResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/warnings",
    security(("jwt_token" = [])),
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Moderation queue", body = PaginatedResponse<WarningResponse>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "warnings"
)]
pub async fn admin_list_warnings(
    Extension(db): Extension<DatabaseConnection>,
    Extension(sync): Extension<crate::search::IndexSync>,
    auth_user: AuthUser,
    Query(params): Query<AdminListWarningsQuery>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(50).min(100);

    let service = WarningService::new(db, sync);
    let (warnings, total) = service.list_admin(params.status, page, per_page).await?;
    let items = warnings.into_iter().map(WarningResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/warnings/{id}/review",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Warning ID")),
    request_body = ReviewWarningRequest,
    responses(
        (status = 200, description = "Warning reviewed", body = WarningResponse),
        (status = 400, description = "Invalid transition", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Warning not found", body = AppError),
    ),
    tag = "warnings"
)]
pub async fn review_warning(
    Extension(db): Extension<DatabaseConnection>,
    Extension(sync): Extension<crate::search::IndexSync>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ReviewWarningRequest>,
) -> AppResult<impl IntoResponse> {
    let reviewer_id = require_moderator(&db, &auth_user).await?;

    let service = WarningService::new(db, sync);
    let warning = service
        .review(id, reviewer_id, payload.status, payload.review_note)
        .await?;

    Ok(ApiResponse::ok(WarningResponse::from(warning)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/warnings/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Warning ID")),
    responses(
        (status = 200, description = "Warning soft-deleted", body = String),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Warning not found", body = AppError),
    ),
    tag = "warnings"
)]
pub async fn delete_warning(
    Extension(db): Extension<DatabaseConnection>,
    Extension(sync): Extension<crate::search::IndexSync>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let service = WarningService::new(db, sync);
    service.soft_delete(id).await?;

    Ok(ApiResponse::ok("Warning deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/warnings/top/scammers",
    params(
        ("days" = Option<u32>, Query, description = "Trailing window in days (default 7)"),
        ("limit" = Option<usize>, Query, description = "Max entries (default 10)"),
    ),
    responses(
        (status = 200, description = "Most-reported scammers, masked accounts", body = Vec<TopScammer>),
    ),
    tag = "warnings"
)]
pub async fn top_scammers(
    Extension(db): Extension<DatabaseConnection>,
    Extension(index): Extension<SearchIndex>,
    Query(params): Query<TopQuery>,
) -> AppResult<impl IntoResponse> {
    let days = params.days.unwrap_or(7).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 50);

    let providers = StatsProviders::new(db, index);
    let mut scammers = providers.top_scammers(days, limit).await?;
    for scammer in &mut scammers {
        scammer.bank_account = scammer
            .bank_account
            .take()
            .map(|account| mask_account(&account));
    }

    Ok(ApiResponse::ok(scammers))
}

#[utoipa::path(
    get,
    path = "/api/v1/warnings/top/searches",
    params(
        ("days" = Option<u32>, Query, description = "Trailing window in days (default 1)"),
        ("limit" = Option<usize>, Query, description = "Max entries (default 10)"),
    ),
    responses(
        (status = 200, description = "Most frequent search queries", body = Vec<TopSearch>),
    ),
    tag = "warnings"
)]
pub async fn top_searches(
    Extension(db): Extension<DatabaseConnection>,
    Extension(index): Extension<SearchIndex>,
    Query(params): Query<TopQuery>,
) -> AppResult<impl IntoResponse> {
    let days = params.days.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 50);

    let providers = StatsProviders::new(db, index);
    let searches = providers.top_searches(days, limit).await?;

    Ok(ApiResponse::ok(searches))
}

async fn current_user(db: &DatabaseConnection, auth_user: &AuthUser) -> AppResult<UserModel> {
    let user_id = parse_user_id(auth_user)?;
    let service = AuthService::new(db.clone());
    service.get_user_by_id(user_id).await
}
