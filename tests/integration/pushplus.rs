//! PushPlus delivery against a mock endpoint

use gridwatch::services::notify::pushplus::DEFAULT_TITLE;
use gridwatch::services::notify::{Notifier, PushPlusNotifier};
use gridwatch::MonitorError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier(server: &MockServer) -> PushPlusNotifier {
    PushPlusNotifier::with_client(
        format!("{}/send", server.uri()),
        "test-token".to_string(),
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn message_is_posted_as_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_partial_json(json!({
            "token": "test-token",
            "content": "HK Dividend ETF TRIM",
            "template": "txt"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "msg": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server).send("HK Dividend ETF TRIM").await.unwrap();
}

#[tokio::test]
async fn default_title_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .and(body_partial_json(json!({"title": DEFAULT_TITLE})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server).send("hello").await.unwrap();
}

#[tokio::test]
async fn rejected_token_is_notify_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 903, "msg": "invalid token"})),
        )
        .mount(&server)
        .await;

    let err = notifier(&server).send("hello").await.unwrap_err();
    assert!(matches!(err, MonitorError::Notify(_)));
}

#[tokio::test]
async fn http_failure_is_notify_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = notifier(&server).send("hello").await.unwrap_err();
    assert!(matches!(err, MonitorError::Notify(_)));
}
