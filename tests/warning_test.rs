mod common;

use common::{approve_warning, create_test_user, create_test_warning, make_admin, spawn_app};

#[tokio::test]
async fn created_warning_round_trips_after_approval() {
    let app = spawn_app().await;
    let (_user_id, token) = create_test_user(&app, "reporter").await;
    let (admin_id, admin_token) = create_test_user(&app, "mod").await;
    make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .post(app.url("/warnings"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "Fake phone shop",
            "scammer_name": "Nguyen Van Roundtrip",
            "bank_account": "111222333444",
            "bank_name": "ACB",
            "facebook_link": "https://facebook.com/fakeshop",
            "content": "Paid for a phone, got a brick",
            "category": "ecommerce",
            "evidence_images": ["/uploads/evidence/a.jpg", "/uploads/evidence/b.jpg"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let warning_id = body["data"]["id"].as_i64().unwrap() as i32;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["warning_count"], 1);
    assert_eq!(body["data"]["view_count"], 0);

    // Pending warnings do not exist publicly.
    let resp = app
        .client
        .get(app.url(&format!("/warnings/{}", warning_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    approve_warning(&app, &admin_token, warning_id).await;

    let resp = app
        .client
        .get(app.url(&format!("/warnings/{}", warning_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let data = &body["data"];
    assert_eq!(data["title"], "Fake phone shop");
    assert_eq!(data["scammer_name"], "Nguyen Van Roundtrip");
    assert_eq!(data["bank_account"], "111222333444");
    assert_eq!(data["bank_name"], "ACB");
    assert_eq!(data["facebook_link"], "https://facebook.com/fakeshop");
    assert_eq!(data["category"], "ecommerce");
    assert_eq!(data["status"], "approved");
    assert_eq!(
        data["evidence_images"],
        serde_json::json!(["/uploads/evidence/a.jpg", "/uploads/evidence/b.jpg"])
    );
    // Server-assigned fields
    assert_eq!(data["warning_count"], 1);
    assert_eq!(data["view_count"], 1); // the public fetch itself counted
}

#[tokio::test]
async fn public_list_excludes_unapproved() {
    let app = spawn_app().await;
    let (_user_id, token) = create_test_user(&app, "lister").await;
    let (admin_id, admin_token) = create_test_user(&app, "lister_mod").await;
    make_admin(&app.db, admin_id).await;

    let pending = create_test_warning(&app, &token, "Pending Person", None).await;
    let approved = create_test_warning(&app, &token, "Approved Person", None).await;
    approve_warning(&app, &admin_token, approved).await;

    let resp = app.client.get(app.url("/warnings")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap() as i32, approved);
    assert!(items.iter().all(|w| w["id"].as_i64().unwrap() as i32 != pending));
}

#[tokio::test]
async fn fallback_search_by_phone_matches_bank_account() {
    // The test harness points the index at a closed port, so this
    // exercises the database fallback path end to end.
    let app = spawn_app().await;
    let (_user_id, token) = create_test_user(&app, "searcher").await;
    let (admin_id, admin_token) = create_test_user(&app, "searcher_mod").await;
    make_admin(&app.db, admin_id).await;

    let a = create_test_warning(&app, &token, "Search Target", Some("0901234567")).await;
    approve_warning(&app, &admin_token, a).await;
    let b = create_test_warning(&app, &token, "Other Account", Some("5556667778")).await;
    approve_warning(&app, &admin_token, b).await;
    // Matching but unapproved: must not appear.
    create_test_warning(&app, &token, "Hidden Match", Some("0901234567")).await;

    let resp = app
        .client
        .get(app.url("/warnings/search"))
        .query(&[("query", "0901234567"), ("search_type", "phone")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap() as i32, a);
    // The read-path counter bump is reflected in the returned record.
    assert_eq!(items[0]["search_count"], 1);
}

#[tokio::test]
async fn fallback_search_orders_by_recency() {
    let app = spawn_app().await;
    let (_user_id, token) = create_test_user(&app, "recency").await;
    let (admin_id, admin_token) = create_test_user(&app, "recency_mod").await;
    make_admin(&app.db, admin_id).await;

    let older = create_test_warning(&app, &token, "Recency Suspect One", None).await;
    approve_warning(&app, &admin_token, older).await;
    let newer = create_test_warning(&app, &token, "Recency Suspect Two", None).await;
    approve_warning(&app, &admin_token, newer).await;

    let resp = app
        .client
        .get(app.url("/warnings/search"))
        .query(&[("query", "Recency Suspect")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"].as_i64().unwrap() as i32, newer);
    assert_eq!(items[1]["id"].as_i64().unwrap() as i32, older);
}

#[tokio::test]
async fn empty_search_query_is_rejected() {
    let app = spawn_app().await;

    let resp = app
        .client
        .get(app.url("/warnings/search"))
        .query(&[("query", "  ")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn suggest_falls_back_to_distinct_names() {
    let app = spawn_app().await;
    let (_user_id, token) = create_test_user(&app, "suggester").await;
    let (admin_id, admin_token) = create_test_user(&app, "suggester_mod").await;
    make_admin(&app.db, admin_id).await;

    for _ in 0..2 {
        let id = create_test_warning(&app, &token, "Suggest Me", None).await;
        approve_warning(&app, &admin_token, id).await;
    }

    let resp = app
        .client
        .get(app.url("/warnings/search/suggest"))
        .query(&[("query", "Suggest")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let suggestions = body["data"]["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 1); // distinct
    assert_eq!(suggestions[0], "Suggest Me");
}

#[tokio::test]
async fn my_warnings_shows_all_statuses() {
    let app = spawn_app().await;
    let (_user_id, token) = create_test_user(&app, "mine").await;

    create_test_warning(&app, &token, "My Pending One", None).await;
    create_test_warning(&app, &token, "My Pending Two", None).await;

    let resp = app
        .client
        .get(app.url("/warnings/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn view_count_increments_on_each_public_fetch() {
    let app = spawn_app().await;
    let (_user_id, token) = create_test_user(&app, "viewer").await;
    let (admin_id, admin_token) = create_test_user(&app, "viewer_mod").await;
    make_admin(&app.db, admin_id).await;

    let id = create_test_warning(&app, &token, "Viewed Person", None).await;
    approve_warning(&app, &admin_token, id).await;

    for expected in 1..=3 {
        let resp = app
            .client
            .get(app.url(&format!("/warnings/{}", id)))
            .send()
            .await
            .unwrap();
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["data"]["view_count"].as_i64().unwrap(), expected);
    }
}
