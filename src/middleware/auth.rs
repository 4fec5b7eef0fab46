use crate::{
    error::AppError,
    models::{User, UserRole},
    utils::jwt::decode_jwt,
};
use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response, Extension};
use sea_orm::{DatabaseConnection, EntityTrait};

/// Extracted user information from JWT token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// JWT authentication middleware
///
/// Verifies the bearer token, checks the account is still active, and adds
/// user info to request extensions.
pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&headers).ok_or(AppError::Unauthorized)?;

    let claims = decode_jwt(&token).map_err(|_| AppError::Unauthorized)?;

    let user_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Validation("Invalid user ID in token".to_string()))?;

    let user = User::find_by_id(user_id)
        .one(&db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Deactivated accounts keep their credentials but lose access.
    if !user.is_active {
        return Err(AppError::Forbidden);
    }

    let auth_user = AuthUser {
        user_id: claims.sub,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let token = auth_header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Best-effort identification on public routes (e.g. search logging):
/// a valid bearer token yields the user id, anything else yields None.
pub fn optional_user_id(headers: &HeaderMap) -> Option<i32> {
    let token = extract_bearer_token(headers)?;
    let claims = decode_jwt(&token).ok()?;
    claims.sub.parse().ok()
}

/// Parse user_id from AuthUser string to i32
pub fn parse_user_id(auth_user: &AuthUser) -> crate::error::AppResult<i32> {
    auth_user
        .user_id
        .parse()
        .map_err(|_| AppError::Validation("Invalid user ID".to_string()))
}

/// Verify the current user is an admin or moderator. Returns the user id.
pub async fn require_moderator(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
) -> crate::error::AppResult<i32> {
    let user_id = parse_user_id(auth_user)?;
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(AppError::Unauthorized)?;
    if !user.role.can_moderate() {
        return Err(AppError::Forbidden);
    }
    Ok(user_id)
}

/// Verify the current user has the admin role exactly (the super-admin
/// tier; moderators are not enough). Returns the user id.
pub async fn require_admin(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
) -> crate::error::AppResult<i32> {
    let user_id = parse_user_id(auth_user)?;
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(AppError::Unauthorized)?;
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden);
    }
    Ok(user_id)
}

/// Extractor for AuthUser from request extensions
use axum::extract::FromRequestParts;

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
