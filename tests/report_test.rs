mod common;

use common::{create_test_user, make_admin, spawn_app};

fn scam_report_payload() -> serde_json::Value {
    serde_json::json!({
        "report_type": "scam",
        "scammer_name": "Pham Van Scam",
        "bank_account": "123456789012",
        "bank_name": "TPBank",
        "content": "Asked for a deposit and vanished",
        "category": "banking",
        "reporter_name": "A Victim",
        "reporter_zalo": "0901112223",
        "reporter_email": "victim@test.com",
        "agree_terms": true
    })
}

#[tokio::test]
async fn scam_report_is_created_pending() {
    let app = spawn_app().await;

    let resp = app
        .client
        .post(app.url("/reports/scam"))
        .json(&scam_report_payload())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["report_type"], "scam");
}

#[tokio::test]
async fn scam_report_requires_name_or_account() {
    let app = spawn_app().await;

    let mut payload = scam_report_payload();
    payload["scammer_name"] = serde_json::Value::Null;
    payload["bank_account"] = serde_json::Value::Null;

    let resp = app
        .client
        .post(app.url("/reports/scam"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn website_report_requires_url() {
    let app = spawn_app().await;

    let resp = app
        .client
        .post(app.url("/reports/website"))
        .json(&serde_json::json!({
            "report_type": "website",
            "content": "Phishing storefront",
            "reporter_name": "A Victim",
            "reporter_zalo": "0901112223",
            "reporter_email": "victim@test.com",
            "agree_terms": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn terms_must_be_accepted() {
    let app = spawn_app().await;

    let mut payload = scam_report_payload();
    payload["agree_terms"] = serde_json::json!(false);

    let resp = app
        .client
        .post(app.url("/reports/scam"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn report_type_must_match_endpoint() {
    let app = spawn_app().await;

    let mut payload = scam_report_payload();
    payload["report_type"] = serde_json::json!("website");

    let resp = app
        .client
        .post(app.url("/reports/scam"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn listing_reports_is_admin_only() {
    let app = spawn_app().await;
    let (_user_id, token) = create_test_user(&app, "rep_user").await;

    let resp = app
        .client
        .get(app.url("/admin/reports"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn admin_review_stamps_report() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = create_test_user(&app, "rep_admin").await;
    make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .post(app.url("/reports/scam"))
        .json(&scam_report_payload())
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let report_id = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .put(app.url(&format!("/admin/reports/{}", report_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "approved");

    // Filtered listing picks it up.
    let resp = app
        .client
        .get(app.url("/admin/reports"))
        .bearer_auth(&admin_token)
        .query(&[("status", "approved")])
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(items
        .iter()
        .any(|r| r["id"].as_i64().unwrap() == report_id));
}

#[tokio::test]
async fn admin_can_delete_report() {
    let app = spawn_app().await;
    let (admin_id, admin_token) = create_test_user(&app, "rep_deleter").await;
    make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .post(app.url("/reports/scam"))
        .json(&scam_report_payload())
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let report_id = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .delete(app.url(&format!("/admin/reports/{}", report_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .delete(app.url(&format!("/admin/reports/{}", report_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
