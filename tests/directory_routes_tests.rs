mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use common::{ADMIN_KEY, TestApp, body_json, get, post_json, with_header};
use serde_json::{Value, json};

fn admin_post(uri: &str, body: &Value) -> Request<Body> {
    with_header(post_json(uri, body), "x-admin-key", ADMIN_KEY)
}

async fn seed_directory(app: &TestApp) {
    for entry in [
        json!({
            "name": "Harmony Records", "type": "Record Label", "location": "Nashville",
            "tags": ["Rock"], "initials": "HR", "bgColor": "primary"
        }),
        json!({
            "name": "Sofia Rodriguez", "type": "Artist", "location": "Madrid",
            "tags": ["Pop"], "initials": "SR", "bgColor": "secondary"
        }),
    ] {
        let resp = app.send(admin_post("/api/directory", &entry)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
}

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|e| e["name"].as_str().expect("name is a string"))
        .collect()
}

#[tokio::test]
async fn directory_listing_applies_search_and_type() {
    let app = TestApp::spawn("directory-filter").await;
    seed_directory(&app).await;

    let all = body_json(app.send(get("/api/directory")).await).await;
    assert_eq!(names(&all), vec!["Harmony Records", "Sofia Rodriguez"]);
    assert_eq!(all[0]["type"], "Record Label");
    assert_eq!(all[0]["bgColor"], "primary");
    assert_eq!(all[0]["tags"], json!(["Rock"]));

    let rock = body_json(app.send(get("/api/directory?search=rock")).await).await;
    assert_eq!(names(&rock), vec!["Harmony Records"]);

    let artists = body_json(app.send(get("/api/directory?type=Artist")).await).await;
    assert_eq!(names(&artists), vec!["Sofia Rodriguez"]);

    let none = body_json(
        app.send(get("/api/directory?search=madrid&type=Record%20Label"))
            .await,
    )
    .await;
    assert!(names(&none).is_empty());
}

#[tokio::test]
async fn directory_category_pages() {
    let app = TestApp::spawn("directory-category").await;
    seed_directory(&app).await;

    let labels = body_json(app.send(get("/api/directory/labels")).await).await;
    assert_eq!(names(&labels), vec!["Harmony Records"]);

    let searched = body_json(app.send(get("/api/directory/artists?search=nash")).await).await;
    assert!(names(&searched).is_empty());

    let resp = app.send(get("/api/directory/venues")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn admin_inserts_require_the_key() {
    let app = TestApp::spawn("directory-admin").await;
    let entry = json!({
        "name": "Beat Lab", "type": "Music Distributor", "location": "Berlin",
        "tags": [], "initials": "BL", "bgColor": "accent"
    });

    let resp = app.send(post_json("/api/directory", &entry)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .send(with_header(post_json("/api/directory", &entry), "authorization", "Bearer pwd"))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert!(created["id"].as_i64().is_some());
    assert_eq!(created["type"], "Music Distributor");
}

#[tokio::test]
async fn invalid_directory_entry_reports_every_field() {
    let app = TestApp::spawn("directory-invalid").await;
    let resp = app
        .send(admin_post("/api/directory", &json!({ "id": 3, "type": "DJ", "tags": [1] })))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .map(|f| f["field"].as_str().expect("field name"))
        .collect();
    assert_eq!(
        fields,
        vec!["name", "type", "location", "tags", "initials", "bgColor"]
    );
    assert!(app.ops.list_directory_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn resources_filter_by_tab_and_search() {
    let app = TestApp::spawn("resources").await;
    for (title, category) in [
        ("Royalty Guide", "Guide"),
        ("Rights Checker", "Tool"),
        ("Split Sheet", "Template"),
    ] {
        let resource = json!({
            "title": title, "description": format!("{title} for artists"),
            "imageUrl": "/img/r.png", "category": category, "date": "2024",
            "accessLink": "https://example.com/r"
        });
        let resp = app.send(admin_post("/api/resources", &resource)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let all = body_json(app.send(get("/api/resources")).await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
    assert_eq!(all[0]["imageUrl"], "/img/r.png");
    assert_eq!(all[0]["downloadLink"], Value::Null);

    let tools = body_json(app.send(get("/api/resources?category=tools")).await).await;
    assert_eq!(tools[0]["title"], "Rights Checker");
    assert_eq!(tools.as_array().unwrap().len(), 1);

    let split = body_json(app.send(get("/api/resources?search=SPLIT&category=all")).await).await;
    assert_eq!(split.as_array().unwrap().len(), 1);

    let resp = app.send(get("/api/resources?category=podcasts")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["fields"][0]["field"], "category");
    assert_eq!(body["error"]["fields"][0]["reason"], "unknown_variant");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = TestApp::spawn("body-limit").await;
    let huge = "a".repeat(cadence_hub::router::BODY_LIMIT_BYTES + 1024);
    let resp = app
        .send(post_json("/api/contact", &json!({ "message": huge })))
        .await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::spawn("health").await;
    let resp = app.send(get("/health")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "status": "ok" }));
}
