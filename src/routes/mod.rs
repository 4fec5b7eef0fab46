use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let intake = intake_routes(&rate_limit_config);
    let public_read = public_read_routes(&rate_limit_config);
    let protected =
        protected_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    intake.merge(public_read).merge(protected)
}

/// Unauthenticated intake: account creation, login and public report
/// submission. Tightest rate limit of the three groups.
fn intake_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/register", routing::post(handlers::register))
        .route("/auth/login", routing::post(handlers::login))
        .route(
            "/reports/scam",
            routing::post(handlers::report::create_scam_report),
        )
        .route(
            "/reports/website",
            routing::post(handlers::report::create_website_report),
        );

    with_optional_rate_limit(router, config.enabled, config.intake)
}

/// Public reads: browsing, search and the admin directory.
fn public_read_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Warnings
        .route("/warnings", routing::get(handlers::warning::list_warnings))
        .route(
            "/warnings/search",
            routing::get(handlers::warning::search_warnings),
        )
        .route(
            "/warnings/search/suggest",
            routing::get(handlers::warning::search_suggest),
        )
        .route(
            "/warnings/top/scammers",
            routing::get(handlers::warning::top_scammers),
        )
        .route(
            "/warnings/top/searches",
            routing::get(handlers::warning::top_searches),
        )
        .route(
            "/warnings/{id}",
            routing::get(handlers::warning::get_warning),
        )
        // Comments
        .route(
            "/warnings/{warning_id}/comments",
            routing::get(handlers::comment::list_comments),
        )
        // Admin directory
        .route("/admins", routing::get(handlers::admin_profile::list_admins))
        .route(
            "/admins/{admin_number}",
            routing::get(handlers::admin_profile::get_admin_by_number),
        );

    with_optional_rate_limit(router, config.enabled, config.public_read)
}

/// Authenticated surface: member actions plus the moderation and
/// super-admin endpoints (role checks happen in the handlers).
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Auth
        .route("/auth/me", routing::get(handlers::get_current_user))
        .route("/auth/profile", routing::put(handlers::user::update_profile))
        // Warnings
        .route("/warnings", routing::post(handlers::warning::create_warning))
        .route("/warnings/me", routing::get(handlers::warning::my_warnings))
        // Comments
        .route("/comments", routing::post(handlers::comment::create_comment))
        .route(
            "/comments/{id}",
            routing::put(handlers::comment::update_comment)
                .delete(handlers::comment::delete_comment),
        )
        // Uploads
        .route("/upload/avatar", routing::post(handlers::upload::upload_avatar))
        .route(
            "/upload/evidence",
            routing::post(handlers::upload::upload_evidence),
        )
        // Moderation: warnings
        .route(
            "/admin/warnings",
            routing::get(handlers::warning::admin_list_warnings),
        )
        .route(
            "/admin/warnings/{id}/review",
            routing::put(handlers::warning::review_warning),
        )
        .route(
            "/admin/warnings/{id}",
            routing::delete(handlers::warning::delete_warning),
        )
        // Moderation: reports
        .route("/admin/reports", routing::get(handlers::report::list_reports))
        .route(
            "/admin/reports/{id}",
            routing::put(handlers::report::update_report)
                .delete(handlers::report::delete_report),
        )
        // User management
        .route("/admin/users", routing::get(handlers::user::list_users))
        .route(
            "/admin/users/{id}",
            routing::get(handlers::user::get_user)
                .put(handlers::user::admin_update_user)
                .delete(handlers::user::delete_user),
        )
        // Admin directory management
        .route(
            "/admins/profiles",
            routing::post(handlers::admin_profile::create_admin_profile),
        )
        .route(
            "/admins/profiles/all",
            routing::get(handlers::admin_profile::list_all_admin_profiles),
        )
        .route(
            "/admins/profiles/{id}",
            routing::put(handlers::admin_profile::update_admin_profile)
                .delete(handlers::admin_profile::delete_admin_profile),
        )
        // Statistics
        .route(
            "/statistics/dashboard",
            routing::get(handlers::statistics::dashboard),
        );

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
