#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        // Point the search index at a closed port so every suite exercises
        // the database fallback deterministically.
        std::env::set_var("SEARCH_INDEX_URL", "http://127.0.0.1:1");
        let config = scamwatch::config::jwt::JwtConfig::from_env().unwrap();
        let _ = scamwatch::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        scamwatch::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    cleanup_tables(&db).await;

    let search_config = scamwatch::config::search::SearchConfig::from_env();
    let search_index = scamwatch::search::SearchIndex::new(&search_config)
        .expect("Failed to build search index client");
    let index_sync = scamwatch::search::IndexSync::spawn(db.clone(), search_index.clone());
    let upload_config = scamwatch::services::upload::UploadConfig {
        upload_dir: "./test_uploads".to_string(),
    };

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(scamwatch::routes::create_routes())
        .layer(axum::middleware::from_fn(
            scamwatch::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(search_index))
        .layer(axum::extract::Extension(index_sync))
        .layer(axum::extract::Extension(upload_config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
    }
}

async fn cleanup_tables(db: &DatabaseConnection) {
    let tables = [
        "search_logs",
        "comments",
        "admin_profiles",
        "reports",
        "warnings",
        "users",
    ];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Register a user and return (user_id, token).
pub async fn create_test_user(app: &TestApp, username_prefix: &str) -> (i32, String) {
    static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let unique_username = format!("{}_{}", username_prefix, counter);

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "username": unique_username,
            "email": format!("{}@test.com", unique_username),
            "password": "test_password_123",
            "confirm_password": "test_password_123"
        }))
        .send()
        .await
        .expect("Failed to register user");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or_else(|e| {
        panic!(
            "Failed to parse register response for '{}': status={}, error={}",
            unique_username, status, e
        );
    });

    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to register '{}': status={}, body={}",
            unique_username, status, body
        );
    }

    let user_id = body["data"]["user_id"].as_i64().expect("missing user_id") as i32;
    let token = body["data"]["token"]
        .as_str()
        .expect("missing token")
        .to_string();
    (user_id, token)
}

/// Promote a user to admin by directly updating the database.
pub async fn make_admin(db: &DatabaseConnection, user_id: i32) {
    set_role(db, user_id, "admin").await;
}

/// Promote a user to moderator by directly updating the database.
pub async fn make_moderator(db: &DatabaseConnection, user_id: i32) {
    set_role(db, user_id, "moderator").await;
}

async fn set_role(db: &DatabaseConnection, user_id: i32, role: &str) {
    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "UPDATE users SET role = $1 WHERE id = $2",
        vec![role.into(), user_id.into()],
    ))
    .await
    .expect("Failed to set user role");
}

/// Submit a warning and return its id (status starts as pending).
pub async fn create_test_warning(
    app: &TestApp,
    token: &str,
    scammer_name: &str,
    bank_account: Option<&str>,
) -> i32 {
    let resp = app
        .client
        .post(app.url("/warnings"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "title": format!("Warning about {}", scammer_name),
            "scammer_name": scammer_name,
            "bank_account": bank_account,
            "bank_name": bank_account.map(|_| "Test Bank"),
            "content": "Collected deposits and disappeared",
            "category": "banking"
        }))
        .send()
        .await
        .expect("Failed to create warning");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create warning: status={}, body={}", status, body);
    }

    body["data"]["id"].as_i64().expect("missing warning id") as i32
}

/// Approve a warning through the review endpoint; returns the response body.
pub async fn approve_warning(app: &TestApp, admin_token: &str, warning_id: i32) -> serde_json::Value {
    let resp = app
        .client
        .put(app.url(&format!("/admin/warnings/{}/review", warning_id)))
        .bearer_auth(admin_token)
        .json(&serde_json::json!({ "status": "approved" }))
        .send()
        .await
        .expect("Failed to review warning");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to approve warning: status={}, body={}", status, body);
    }
    body["data"].clone()
}
