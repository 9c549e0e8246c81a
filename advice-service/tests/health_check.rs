mod common;

use advice_service::startup::Application;
use common::{test_config, FRONTEND_ORIGIN};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Boots the service on a random port against a mocked Gemini API and
/// returns its base address.
async fn spawn_app(gemini: &MockServer) -> String {
    let app = Application::build(test_config(&gemini.uri()))
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.port());
    tokio::spawn(app.run_until_stopped());
    address
}

#[tokio::test]
async fn health_check_works() {
    let gemini = MockServer::start().await;
    let address = spawn_app(&gemini).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/health", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn home_works() {
    let gemini = MockServer::start().await;
    let address = spawn_app(&gemini).await;

    let response = reqwest::get(format!("{}/", address)).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "API is running");
}

#[tokio::test]
async fn parse_round_trips_through_gemini() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Assessment: playful.\nOption 1: Friday works!"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&gemini)
        .await;
    let address = spawn_app(&gemini).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/parse", address))
        .header("origin", FRONTEND_ORIGIN)
        .json(&json!({"email": "A: Friday?\nB: maybe"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        FRONTEND_ORIGIN
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"response": "Assessment: playful.\nOption 1: Friday works!"})
    );

    let requests = gemini.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("A: Friday?\nB: maybe"));
    assert!(prompt.ends_with("Be very brief and concise"));
}

#[tokio::test]
async fn gemini_outage_surfaces_as_500() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&gemini)
        .await;
    let address = spawn_app(&gemini).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/parse", address))
        .json(&json!({"email": "hi"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to analyze conversation");
    assert!(body["details"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn build_fails_without_api_key() {
    let gemini = MockServer::start().await;
    let mut config = test_config(&gemini.uri());
    config.gemini.api_key = secrecy::Secret::new(String::new());

    let result = Application::build(config).await;

    assert!(result.is_err());
}
