mod common;

use common::{approve_warning, create_test_user, create_test_warning, make_admin, make_moderator, spawn_app};

#[tokio::test]
async fn comment_on_approved_warning() {
    let app = spawn_app().await;
    let (_uid, token) = create_test_user(&app, "commenter").await;
    let (admin_id, admin_token) = create_test_user(&app, "c_admin").await;
    make_admin(&app.db, admin_id).await;

    let warning_id = create_test_warning(&app, &token, "Commented Person", None).await;
    approve_warning(&app, &admin_token, warning_id).await;

    let resp = app
        .client
        .post(app.url("/comments"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "warning_id": warning_id,
            "content": "Same scammer took my money too",
            "is_verified_victim": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["warning_id"].as_i64().unwrap() as i32, warning_id);
    assert_eq!(body["data"]["is_verified_victim"], true);

    let resp = app
        .client
        .get(app.url(&format!("/warnings/{}/comments", warning_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn comment_on_pending_warning_is_not_found() {
    let app = spawn_app().await;
    let (_uid, token) = create_test_user(&app, "early_commenter").await;

    let warning_id = create_test_warning(&app, &token, "Still Pending", None).await;

    let resp = app
        .client
        .post(app.url("/comments"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "warning_id": warning_id,
            "content": "first!"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn only_author_or_moderator_may_edit() {
    let app = spawn_app().await;
    let (_uid, author_token) = create_test_user(&app, "author").await;
    let (_uid2, stranger_token) = create_test_user(&app, "stranger").await;
    let (mod_id, mod_token) = create_test_user(&app, "c_mod").await;
    make_moderator(&app.db, mod_id).await;
    let (admin_id, admin_token) = create_test_user(&app, "c_admin2").await;
    make_admin(&app.db, admin_id).await;

    let warning_id = create_test_warning(&app, &author_token, "Edit Target", None).await;
    approve_warning(&app, &admin_token, warning_id).await;

    let resp = app
        .client
        .post(app.url("/comments"))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "warning_id": warning_id, "content": "original" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let comment_id = body["data"]["id"].as_i64().unwrap();

    // Stranger: forbidden.
    let resp = app
        .client
        .put(app.url(&format!("/comments/{}", comment_id)))
        .bearer_auth(&stranger_token)
        .json(&serde_json::json!({ "content": "hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Author: fine.
    let resp = app
        .client
        .put(app.url(&format!("/comments/{}", comment_id)))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "content": "edited by author" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Moderator: may delete.
    let resp = app
        .client
        .delete(app.url(&format!("/comments/{}", comment_id)))
        .bearer_auth(&mod_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .delete(app.url(&format!("/comments/{}", comment_id)))
        .bearer_auth(&mod_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
