mod config;
mod error;
mod handlers;
mod middleware;
mod migration;
mod models;
mod response;
mod routes;
mod search;
mod services;
mod utils;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use models::{warning, Warning, WarningStatus};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Statement,
};
use sea_orm_migration::MigratorTrait;
use search::{IndexSync, SearchIndex, WarningDocument};
use serde_json::json;
use services::upload::UploadConfig;
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Auth routes
        crate::handlers::register,
        crate::handlers::login,
        crate::handlers::get_current_user,
        // User routes
        crate::handlers::user::update_profile,
        crate::handlers::user::list_users,
        crate::handlers::user::get_user,
        crate::handlers::user::admin_update_user,
        crate::handlers::user::delete_user,
        // Warning routes
        crate::handlers::warning::search_warnings,
        crate::handlers::warning::search_suggest,
        crate::handlers::warning::list_warnings,
        crate::handlers::warning::get_warning,
        crate::handlers::warning::create_warning,
        crate::handlers::warning::my_warnings,
        crate::handlers::warning::admin_list_warnings,
        crate::handlers::warning::review_warning,
        crate::handlers::warning::delete_warning,
        crate::handlers::warning::top_scammers,
        crate::handlers::warning::top_searches,
        // Report routes
        crate::handlers::report::create_scam_report,
        crate::handlers::report::create_website_report,
        crate::handlers::report::list_reports,
        crate::handlers::report::update_report,
        crate::handlers::report::delete_report,
        // Comment routes
        crate::handlers::comment::create_comment,
        crate::handlers::comment::list_comments,
        crate::handlers::comment::update_comment,
        crate::handlers::comment::delete_comment,
        // Admin directory routes
        crate::handlers::admin_profile::list_admins,
        crate::handlers::admin_profile::get_admin_by_number,
        crate::handlers::admin_profile::create_admin_profile,
        crate::handlers::admin_profile::list_all_admin_profiles,
        crate::handlers::admin_profile::update_admin_profile,
        crate::handlers::admin_profile::delete_admin_profile,
        // Upload routes
        crate::handlers::upload::upload_avatar,
        crate::handlers::upload::upload_evidence,
        // Statistics routes
        crate::handlers::statistics::dashboard,
    ),
    components(
        schemas(
            crate::response::ApiResponse<serde_json::Value>,
            crate::response::PaginatedResponse<serde_json::Value>,
            crate::response::PaginationQuery,
            crate::error::AppError,
            // Auth
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::AuthResponse,
            crate::handlers::auth::UserResponse,
            // User
            crate::handlers::user::UpdateProfileRequest,
            crate::handlers::user::AdminUpdateUserRequest,
            // Warning
            crate::handlers::warning::CreateWarningRequest,
            crate::handlers::warning::SearchWarningsQuery,
            crate::handlers::warning::ReviewWarningRequest,
            crate::handlers::warning::WarningResponse,
            crate::handlers::warning::SuggestResponse,
            // Report
            crate::handlers::report::CreateReportRequest,
            crate::handlers::report::UpdateReportRequest,
            crate::handlers::report::ReportResponse,
            // Comment
            crate::handlers::comment::CreateCommentRequest,
            crate::handlers::comment::UpdateCommentRequest,
            crate::handlers::comment::CommentResponse,
            // Admin directory
            crate::handlers::admin_profile::CreateAdminProfileRequest,
            crate::handlers::admin_profile::UpdateAdminProfileRequest,
            crate::handlers::admin_profile::AdminProfileResponse,
            // Upload
            crate::handlers::upload::UploadResponse,
            crate::handlers::upload::MultiUploadResponse,
            // Statistics
            crate::services::statistics::DashboardStats,
            crate::services::statistics::RecentWarning,
            crate::search::TopScammer,
            crate::search::TopSearch,
        )
    ),
    tags(
        (name = "auth", description = "Authentication operations"),
        (name = "users", description = "User profile and account management"),
        (name = "warnings", description = "Scam warnings: browse, search, submit, review"),
        (name = "reports", description = "Public scam/website report intake and moderation"),
        (name = "comments", description = "Comments on approved warnings"),
        (name = "admins", description = "Public admin directory"),
        (name = "uploads", description = "Evidence and avatar uploads"),
        (name = "statistics", description = "Dashboard rollups"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scamwatch=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration before doing anything else
    let jwt_config = validate_config()?;
    utils::jwt::init_jwt_config(jwt_config)?;

    tracing::info!("Starting ScamWatch API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database().await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    services::bootstrap_admin::ensure_bootstrap_admin(&db).await?;

    // The search index is optional at runtime: a dead instance only costs
    // ranked search and index-backed top lists, never availability.
    let search_config = config::search::SearchConfig::from_env();
    let search_index = SearchIndex::new(&search_config)
        .map_err(|e| anyhow::anyhow!("Invalid search index configuration: {e}"))?;

    if search_index.is_healthy().await {
        tracing::info!("Search index connected at {}", search_config.url);
        if let Err(e) = search_index.ensure_indexes().await {
            tracing::warn!("Failed to apply search index settings: {e}");
        }
        match reindex_approved_warnings(&db, &search_index).await {
            Ok(count) => tracing::info!("Reindexed {count} approved warnings"),
            Err(e) => tracing::warn!("Startup reindex failed: {e}"),
        }
    } else {
        tracing::warn!(
            "Search index unreachable at {}, running with database fallback",
            search_config.url
        );
    }

    let index_sync = IndexSync::spawn(db.clone(), search_index.clone());

    let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());
    let upload_config = UploadConfig {
        upload_dir: upload_dir.clone(),
    };

    let app = create_app(&upload_dir)
        .layer(Extension(db))
        .layer(Extension(search_index))
        .layer(Extension(index_sync))
        .layer(Extension(upload_config));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<crate::config::jwt::JwtConfig> {
    let jwt_config = config::jwt::JwtConfig::from_env()?;

    // DATABASE_URL — checked here for early error; actual connection happens later
    if env::var("DATABASE_URL").is_err() {
        return Err(anyhow::anyhow!(
            "DATABASE_URL environment variable must be set"
        ));
    }

    let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());
    std::fs::create_dir_all(&upload_dir).map_err(|e| {
        anyhow::anyhow!("Failed to create upload directory '{}': {}", upload_dir, e)
    })?;

    Ok(jwt_config)
}

/// Push every approved warning into the index so a cold index catches up
/// with the store.
async fn reindex_approved_warnings(
    db: &DatabaseConnection,
    index: &SearchIndex,
) -> anyhow::Result<usize> {
    let approved = Warning::find()
        .filter(warning::Column::Status.eq(WarningStatus::Approved))
        .all(db)
        .await?;

    let docs: Vec<WarningDocument> = approved.iter().map(WarningDocument::from).collect();
    index.bulk_upsert_warnings(&docs).await?;
    Ok(docs.len())
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app(upload_dir: &str) -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(axum::middleware::from_fn(
            middleware::security::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(
    Extension(db): Extension<DatabaseConnection>,
    Extension(index): Extension<SearchIndex>,
) -> impl IntoResponse {
    let db_ok = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();
    let index_ok = index.is_healthy().await;

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "ScamWatch API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
        "search_index": index_ok,
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
