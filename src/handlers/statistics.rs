use crate::error::{AppError, AppResult};
use crate::middleware::auth::{require_moderator, AuthUser};
use crate::response::ApiResponse;
use crate::search::SearchIndex;
use crate::services::statistics::{DashboardStats, StatisticsService};
use axum::{extract::Query, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DashboardQuery {
    /// Trailing window in days (default 7, min 1)
    pub days: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/statistics/dashboard",
    security(("jwt_token" = [])),
    params(("days" = Option<u32>, Query, description = "Trailing window in days")),
    responses(
        (status = 200, description = "Dashboard rollups", body = DashboardStats),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "statistics"
)]
pub async fn dashboard(
    Extension(db): Extension<DatabaseConnection>,
    Extension(index): Extension<SearchIndex>,
    auth_user: AuthUser,
    Query(params): Query<DashboardQuery>,
) -> AppResult<impl IntoResponse> {
    require_moderator(&db, &auth_user).await?;

    let days = params.days.unwrap_or(7).max(1);

    let service = StatisticsService::new(db, index);
    let stats = service.dashboard(days).await?;

    Ok(ApiResponse::ok(stats))
}
