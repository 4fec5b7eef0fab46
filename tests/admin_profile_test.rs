mod common;

use common::{create_test_user, make_admin, make_moderator, spawn_app};

async fn create_profile(
    app: &common::TestApp,
    admin_token: &str,
    user_id: i32,
    admin_number: i32,
) -> reqwest::Response {
    app.client
        .post(app.url("/admins/profiles"))
        .bearer_auth(admin_token)
        .json(&serde_json::json!({
            "user_id": user_id,
            "admin_number": admin_number,
            "facebook_main": "https://facebook.com/trusted.admin",
            "zalo": "0905556667",
            "services": { "escrow": true },
            "bank_accounts": [{ "bank": "VCB", "account": "111222333" }],
            "insurance_fund": 5000.0
        }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn super_admin_creates_public_card() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = create_test_user(&app, "prof_admin").await;
    make_admin(&app.db, admin_id).await;
    let (member_id, _) = create_test_user(&app, "prof_member").await;

    let resp = create_profile(&app, &admin_token, member_id, 1).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["admin_number"], 1);
    assert_eq!(body["data"]["is_public"], true);

    // Publicly visible by number, no auth required.
    let resp = app.client.get(app.url("/admins/1")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["zalo"], "0905556667");
}

#[tokio::test]
async fn moderator_cannot_create_profiles() {
    let app = spawn_app().await;
    let (mod_id, mod_token) = create_test_user(&app, "prof_mod").await;
    make_moderator(&app.db, mod_id).await;
    let (member_id, _) = create_test_user(&app, "prof_member2").await;

    let resp = create_profile(&app, &mod_token, member_id, 2).await;
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn duplicate_admin_number_is_rejected() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = create_test_user(&app, "prof_dup_admin").await;
    make_admin(&app.db, admin_id).await;
    let (member_a, _) = create_test_user(&app, "prof_dup_a").await;
    let (member_b, _) = create_test_user(&app, "prof_dup_b").await;

    let resp = create_profile(&app, &admin_token, member_a, 7).await;
    assert_eq!(resp.status(), 200);

    let resp = create_profile(&app, &admin_token, member_b, 7).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn hidden_profiles_do_not_appear_publicly() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = create_test_user(&app, "prof_hide_admin").await;
    make_admin(&app.db, admin_id).await;
    let (member_id, _) = create_test_user(&app, "prof_hidden").await;

    let resp = create_profile(&app, &admin_token, member_id, 9).await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let profile_id = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .put(app.url(&format!("/admins/profiles/{}", profile_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "is_public": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Hidden from the public directory and the by-number lookup...
    let resp = app.client.get(app.url("/admins/9")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = app.client.get(app.url("/admins")).send().await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["id"].as_i64().unwrap() != profile_id));

    // ...but still in the moderator listing.
    let resp = app
        .client
        .get(app.url("/admins/profiles/all"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"].as_i64().unwrap() == profile_id));
}
