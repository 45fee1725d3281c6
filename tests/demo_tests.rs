
use portfolio_api::settings::IntegrationKeys;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn gmaps_search_returns_mock_results() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/demo/gmaps-search?q=nha%20hang", "10.5.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-mock").unwrap(), "true");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["mock"], true);
    assert_eq!(body["query"], "nha hang");

    let results = body["results"].as_array().unwrap();
    assert!((1..=3).contains(&results.len()));
    assert_eq!(body["total"], results.len());
}

#[actix_rt::test]
async fn gmaps_search_needs_a_query() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/demo/gmaps-search", "10.5.0.2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing query parameter");
}

#[actix_rt::test]
async fn trade_report_normalizes_symbol() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/demo/trade-report?symbol=aapl", "10.5.0.3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["mock"], true);
    assert_eq!(body["report"]["symbol"], "AAPL");
    assert_eq!(body["report"]["recent_news"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn trade_report_rejects_bad_symbols() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/demo/trade-report?symbol=TOOLONG", "10.5.0.4").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid symbol format");
}

#[actix_rt::test]
async fn demos_stay_mocked_when_keys_are_present() {
    let app = TestApp::spawn_with(TestOptions {
        integrations: IntegrationKeys {
            google_places_api_key: Some("places-key".into()),
            trading_api_key: Some("trading-key".into()),
            ..IntegrationKeys::default()
        },
        ..TestOptions::default()
    })
    .await;

    let gmaps: Value = app
        .get("/api/demo/gmaps-search?q=cafe", "10.5.0.5")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(gmaps["mock"], true);
    assert_eq!(gmaps["integration_status"]["google_places_api"], "configured_but_mocked");

    let trade: Value = app
        .get("/api/demo/trade-report?symbol=VNM", "10.5.0.5")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(trade["mock"], true);
    assert_eq!(trade["integration_status"]["trading_api"], "configured_but_mocked");
}

#[actix_rt::test]
async fn post_is_not_allowed() {
    let app = TestApp::spawn().await;

    let response = app.request(Method::POST, "/api/demo/trade-report", "10.5.0.6").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get("allow").unwrap(), "GET");
}
