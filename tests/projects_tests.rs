
use reqwest::{Method, StatusCode};
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn lists_seeded_projects() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/projects", "10.6.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("cache-control").unwrap(), "public, max-age=300");
    assert_eq!(response.headers().get("x-mock").unwrap(), "true");

    let body: Value = response.json().await.unwrap();
    let projects = body["projects"].as_array().unwrap();
    assert!(!projects.is_empty());
    assert_eq!(body["total"], projects.len());
    assert!(projects[0]["shortDescription"].is_string());
}

#[actix_rt::test]
async fn missing_seed_file_is_a_500() {
    let app = TestApp::spawn_with(TestOptions {
        projects_file: Some(temp_dir().join("absent.json")),
        ..TestOptions::default()
    })
    .await;

    let response = app.get("/api/projects", "10.6.0.2").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn loosely_shaped_seed_is_still_served() {
    let seed = temp_dir().join("projects.json");
    std::fs::write(
        &seed,
        r#"{"projects":[{"id":1,"title":"A","badges":null},{"id":"b","screenshots":null}]}"#,
    )
    .unwrap();

    let app = TestApp::spawn_with(TestOptions {
        projects_file: Some(seed),
        ..TestOptions::default()
    })
    .await;

    let response = app.get("/api/projects", "10.6.0.5").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["projects"][0]["id"], 1);
    assert_eq!(body["projects"][0]["badges"], serde_json::json!([]));
    assert_eq!(body["projects"][1]["id"], "b");
}

#[actix_rt::test]
async fn post_is_not_allowed() {
    let app = TestApp::spawn().await;

    let response = app.request(Method::POST, "/api/projects", "10.6.0.3").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get("allow").unwrap(), "GET");
}

#[actix_rt::test]
async fn health_and_banner_respond() {
    let app = TestApp::spawn().await;

    let health = app.get("/api/health", "10.6.0.4").await;
    assert_eq!(health.status(), StatusCode::OK);
    let body: Value = health.json().await.unwrap();
    assert!(body["status"].is_string());

    let home = app.get("/", "10.6.0.4").await;
    assert_eq!(home.status(), StatusCode::OK);
}
