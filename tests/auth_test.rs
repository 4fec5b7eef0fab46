mod common;

use common::{create_test_user, make_admin, spawn_app};
use sea_orm::{ConnectionTrait, Statement};

#[tokio::test]
async fn register_and_login() {
    let app = spawn_app().await;

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "username": "alice_register",
            "email": "alice_register@test.com",
            "password": "password123",
            "confirm_password": "password123",
            "full_name": "Alice"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["success"].as_bool().unwrap());
    assert!(body["data"]["token"].as_str().is_some());
    assert_eq!(body["data"]["role"], "user");

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "username": "alice_register",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["username"], "alice_register");
}

#[tokio::test]
async fn duplicate_username_is_rejected_without_creating_a_row() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "username": "bob_duplicate",
        "email": "bob_duplicate@test.com",
        "password": "password123",
        "confirm_password": "password123"
    });

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let row = app
        .db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT COUNT(*) AS count FROM users WHERE username = 'bob_duplicate'".to_string(),
        ))
        .await
        .unwrap()
        .unwrap();
    let count: i64 = row.try_get("", "count").unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn mismatched_passwords_are_rejected() {
    let app = spawn_app().await;

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "username": "carol_mismatch",
            "password": "password123",
            "confirm_password": "different456"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    create_test_user(&app, "dave").await;

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "username": "dave_0",
            "password": "not_the_password"
        }))
        .send()
        .await
        .unwrap();
    // Either the user exists with a wrong password or the counter-suffixed
    // name missed; both must read as unauthorized, never a 500.
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn me_requires_token_and_returns_profile() {
    let app = spawn_app().await;
    let (user_id, token) = create_test_user(&app, "erin").await;

    let resp = app.client.get(app.url("/auth/me")).send().await.unwrap();
    assert_eq!(resp.status(), 401);

    let resp = app
        .client
        .get(app.url("/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["id"].as_i64().unwrap() as i32, user_id);
}

#[tokio::test]
async fn deactivated_account_cannot_login() {
    let app = spawn_app().await;
    let (user_id, _token) = create_test_user(&app, "frank").await;

    // Fetch the username, then deactivate.
    let row = app
        .db
        .query_one(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT username FROM users WHERE id = $1",
            vec![user_id.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    let username: String = row.try_get("", "username").unwrap();

    app.db
        .execute(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "UPDATE users SET is_active = FALSE WHERE id = $1",
            vec![user_id.into()],
        ))
        .await
        .unwrap();

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "username": username,
            "password": "test_password_123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn admin_cannot_be_deleted() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = create_test_user(&app, "root").await;
    make_admin(&app.db, admin_id).await;
    let (other_admin_id, _) = create_test_user(&app, "root2").await;
    make_admin(&app.db, other_admin_id).await;

    let resp = app
        .client
        .delete(app.url(&format!("/admin/users/{}", other_admin_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}
