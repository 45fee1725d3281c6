
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn valid_sms_returns_masked_mock() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/api/sms", &json!({ "phone": "0901234567", "message": "Xin chào" }), "10.3.0.1")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-mock").unwrap(), "true");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["mock"], true);
    assert_eq!(body["sent_data"]["phone"], "******4567");
    assert_eq!(body["sent_data"]["type"], "notification");
    assert_eq!(body["integration_status"]["twilio"], "not_configured");
    assert!(body["sms_id"].as_str().unwrap().starts_with("mock_sms_"));
}

#[actix_rt::test]
async fn invalid_phone_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/api/sms", &json!({ "phone": "12345", "message": "hi" }), "10.3.0.2")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid phone number");
}

#[actix_rt::test]
async fn long_message_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/api/sms",
            &json!({ "phone": "0901234567", "message": "a".repeat(161) }),
            "10.3.0.3",
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Message too long");
}

#[actix_rt::test]
async fn get_is_not_allowed() {
    let app = TestApp::spawn().await;

    let response = app.request(Method::GET, "/api/sms", "10.3.0.4").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get("allow").unwrap(), "POST");
}
