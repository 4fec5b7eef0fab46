use crate::error::{AppError, AppResult};
use crate::middleware::auth::{optional_user_id, require_moderator, AuthUser};
use crate::models::{ReportModel, ReportType, ScamCategory, WarningStatus};
use crate::response::{ApiResponse, PaginatedResponse};
use crate::services::report::{NewReport, ReportService};
use axum::http::HeaderMap;
use axum::{extract::Path, extract::Query, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReportRequest {
    /// scam or website
    pub report_type: ReportType,
    /// Name of the reported actor (scam reports)
    pub scammer_name: Option<String>,
    /// Bank account (scam reports)
    pub bank_account: Option<String>,
    /// Bank name
    pub bank_name: Option<String>,
    /// Facebook link
    pub facebook_link: Option<String>,
    /// Fraudulent site URL (website reports)
    pub website_url: Option<String>,
    /// Site category (website reports)
    pub website_category: Option<String>,
    /// Description (1+ characters)
    #[validate(length(min = 1))]
    pub content: String,
    /// Evidence image URLs from the upload endpoint
    pub evidence_images: Option<Vec<String>>,
    /// Scam category (defaults to other)
    pub category: Option<ScamCategory>,
    /// Reporter name
    #[validate(length(min = 1, max = 255))]
    pub reporter_name: String,
    /// Reporter Zalo contact
    #[validate(length(min = 1, max = 50))]
    pub reporter_zalo: String,
    /// Reporter email
    #[validate(email)]
    pub reporter_email: String,
    /// Terms acceptance; must be true
    pub agree_terms: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListReportsQuery {
    /// Filter by report type
    pub report_type: Option<ReportType>,
    /// Filter by status
    pub status: Option<WarningStatus>,
    /// Page number
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReportRequest {
    /// New review status
    pub status: WarningStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub id: i32,
    pub report_type: ReportType,
    pub scammer_name: Option<String>,
    pub bank_account: Option<String>,
    pub bank_name: Option<String>,
    pub facebook_link: Option<String>,
    pub website_url: Option<String>,
    pub website_category: Option<String>,
    pub content: String,
    pub evidence_images: Vec<String>,
    pub category: ScamCategory,
    pub status: WarningStatus,
    pub reporter_name: String,
    pub reporter_zalo: String,
    pub reporter_email: String,
    pub agree_terms: bool,
    pub created_at: String,
}

impl From<ReportModel> for ReportResponse {
    fn from(r: ReportModel) -> Self {
        Self {
            id: r.id,
            report_type: r.report_type,
            scammer_name: r.scammer_name,
            bank_account: r.bank_account,
            bank_name: r.bank_name,
            facebook_link: r.facebook_link,
            website_url: r.website_url,
            website_category: r.website_category,
            content: r.content,
            evidence_images: r.evidence_images.0,
            category: r.category,
            status: r.status,
            reporter_name: r.reporter_name,
            reporter_zalo: r.reporter_zalo,
            reporter_email: r.reporter_email,
            agree_terms: r.agree_terms,
            created_at: r.created_at.to_string(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/reports/scam",
    request_body = CreateReportRequest,
    responses(
        (status = 200, description = "Scam report filed", body = ReportResponse),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "reports"
)]
pub async fn create_scam_report(
    Extension(db): Extension<DatabaseConnection>,
    headers: HeaderMap,
    Json(payload): Json<CreateReportRequest>,
) -> AppResult<impl IntoResponse> {
    create_report(db, headers, payload, ReportType::Scam).await
}

#[utoipa::path(
    post,
    path = "/api/v1/reports/website",
    request_body = CreateReportRequest,
    responses(
        (status = 200, description = "Website report filed", body = ReportResponse),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "reports"
)]
pub async fn create_website_report(
    Extension(db): Extension<DatabaseConnection>,
    headers: HeaderMap,
    Json(payload): Json<CreateReportRequest>,
) -> AppResult<impl IntoResponse> {
    create_report(db, headers, payload, ReportType::Website).await
}

async fn create_report(
    db: DatabaseConnection,
    headers: HeaderMap,
    payload: CreateReportRequest,
    expected_type: ReportType,
) -> AppResult<ApiResponse<ReportResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if payload.report_type != expected_type {
        return Err(AppError::Validation("Invalid report type".to_string()));
    }

    // Reports are open intake; a valid token only attributes the reporter.
    let reporter_id = optional_user_id(&headers);

    let service = ReportService::new(db);
    let report = service
        .create(NewReport {
            report_type: payload.report_type,
            scammer_name: payload.scammer_name,
            bank_account: payload.bank_account,
            bank_name: payload.bank_name,
            facebook_link: payload.facebook_link,
            website_url: payload.website_url,
            website_category: payload.website_category,
            content: payload.content,
            evidence_images: payload.evidence_images.unwrap_or_default(),
            category: payload.category.unwrap_or(ScamCategory::Other),
            reporter_id,
            reporter_name: payload.reporter_name,
            reporter_zalo: payload.reporter_zalo,
            reporter_email: payload.reporter_email,
            agree_terms: payload.agree_terms,
        })
        .await?;

    Ok(ApiResponse::ok(ReportResponse::from(report)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/reports",
    security(("jwt_token" = [])),
    params(
        ("report_type" = Option<String>, Query, description = "Filter by type"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "List of reports", body = PaginatedResponse<ReportResponse>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "reports"
)]
pub async fn list_reports(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(params): Query<ListReportsQuery>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(50).min(100);

    let service = ReportService::new(db);
    let (reports, total) = service
        .list(params.report_type, params.status, page, per_page)
        .await?;
    let items = reports.into_iter().map(ReportResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/reports/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Report ID")),
    request_body = UpdateReportRequest,
    responses(
        (status = 200, description = "Report reviewed", body = ReportResponse),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "reports"
)]
pub async fn update_report(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReportRequest>,
) -> AppResult<impl IntoResponse> {
    let reviewer_id = require_moderator(&db, &auth_user).await?;

    let service = ReportService::new(db);
    let report = service.update_status(id, reviewer_id, payload.status).await?;

    Ok(ApiResponse::ok(ReportResponse::from(report)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/reports/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted", body = String),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Report not found", body = AppError),
    ),
    tag = "reports"
)]
pub async fn delete_report(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let service = ReportService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("Report deleted successfully"))
}
