use crate::error::{AppError, AppResult};
use crate::middleware::auth::parse_user_id;
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::services::upload::{UploadConfig, UploadService};
use crate::services::user::UserService;
use axum::{extract::Multipart, response::IntoResponse, Extension};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MultiUploadResponse {
    pub urls: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/upload/avatar",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Avatar uploaded and set", body = UploadResponse),
        (status = 400, description = "Not an accepted image", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 413, description = "File too large", body = AppError),
    ),
    tag = "uploads"
)]
pub async fn upload_avatar(
    Extension(db): Extension<DatabaseConnection>,
    Extension(config): Extension<UploadConfig>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;

    let url = UploadService::save_file(&config, &data, &content_type, "avatars").await?;

    let service = UserService::new(db);
    service.update_avatar_url(user_id, &url).await?;

    Ok(ApiResponse::ok(UploadResponse { url }))
}

/// Upload evidence images for a warning or report. Individual files that
/// fail validation are skipped; the response lists the URLs that made it,
/// in input order.
#[utoipa::path(
    post,
    path = "/api/v1/upload/evidence",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Uploaded evidence URLs in input order", body = MultiUploadResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "uploads"
)]
pub async fn upload_evidence(
    Extension(config): Extension<UploadConfig>,
    _auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut files: Vec<(Vec<u8>, String)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?
    {
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        match field.bytes().await {
            Ok(data) => files.push((data.to_vec(), content_type)),
            Err(e) => tracing::warn!("skipping unreadable upload part: {e}"),
        }
    }

    if files.is_empty() {
        return Err(AppError::Validation("No files provided".to_string()));
    }

    let urls = UploadService::save_many(&config, files, "evidence").await;

    Ok(ApiResponse::ok(MultiUploadResponse { urls }))
}
