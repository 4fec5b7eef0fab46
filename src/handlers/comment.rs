use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::models::CommentModel;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::auth::AuthService;
use crate::services::comment::CommentService;
use axum::{extract::Path, extract::Query, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    /// Target warning ID
    pub warning_id: i32,
    /// Comment text (1-5000 characters)
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    /// Commenter claims to be a victim of the same scam
    pub is_verified_victim: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCommentRequest {
    /// New comment text (1-5000 characters)
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub warning_id: i32,
    pub user_id: i32,
    pub content: String,
    pub is_verified_victim: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<CommentModel> for CommentResponse {
    fn from(c: CommentModel) -> Self {
        Self {
            id: c.id,
            warning_id: c.warning_id,
            user_id: c.user_id,
            content: c.content,
            is_verified_victim: c.is_verified_victim,
            created_at: c.created_at.to_string(),
            updated_at: c.updated_at.map(|t| t.to_string()),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/comments",
    security(("jwt_token" = [])),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Warning not found or not approved", body = AppError),
    ),
    tag = "comments"
)]
pub async fn create_comment(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user_id = parse_user_id(&auth_user)?;

    let service = CommentService::new(db);
    let comment = service
        .create(
            payload.warning_id,
            user_id,
            &payload.content,
            payload.is_verified_victim.unwrap_or(false),
        )
        .await?;

    Ok(ApiResponse::ok(CommentResponse::from(comment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/warnings/{warning_id}/comments",
    params(
        ("warning_id" = i32, Path, description = "Warning ID"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Comments, newest first", body = PaginatedResponse<CommentResponse>),
    ),
    tag = "comments"
)]
pub async fn list_comments(
    Extension(db): Extension<DatabaseConnection>,
    Path(warning_id): Path<i32>,
    Query(params): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let (page, per_page) = params.clamped(50);

    let service = CommentService::new(db);
    let (comments, total) = service.list_by_warning(warning_id, page, per_page).await?;
    let items = comments.into_iter().map(CommentResponse::from).collect();

    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 403, description = "Not the author or a moderator", body = AppError),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "comments"
)]
pub async fn update_comment(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCommentRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user_id = parse_user_id(&auth_user)?;
    let actor = AuthService::new(db.clone()).get_user_by_id(user_id).await?;

    let service = CommentService::new(db);
    let comment = service.update(id, &actor, &payload.content).await?;

    Ok(ApiResponse::ok(CommentResponse::from(comment)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted", body = String),
        (status = 403, description = "Not the author or a moderator", body = AppError),
        (status = 404, description = "Comment not found", body = AppError),
    ),
    tag = "comments"
)]
pub async fn delete_comment(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let actor = AuthService::new(db.clone()).get_user_by_id(user_id).await?;

    let service = CommentService::new(db);
    service.delete(id, &actor).await?;

    Ok(ApiResponse::ok("Comment deleted successfully"))
}
