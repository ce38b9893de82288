//! Expo dispatcher tests against a local mock gateway

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use hc_core::domain::entities::{NotificationPayload, PushMessage, PushToken};
use hc_core::errors::PushError;
use hc_core::services::NotificationDispatcher;
use hc_shared::config::PushConfig;

use crate::dispatch::expo::parse_send_response;
use crate::dispatch::ExpoPushDispatcher;

fn batch(tokens: &[&str]) -> Vec<PushMessage> {
    let payload = NotificationPayload::default();
    tokens
        .iter()
        .map(|t| PushMessage::new(&PushToken::parse(*t).unwrap(), &payload))
        .collect()
}

fn dispatcher_for(server: &MockServer, access_token: Option<&str>) -> ExpoPushDispatcher {
    let config = PushConfig {
        provider: "expo".to_string(),
        url: format!("{}/--/api/v2/push/send", server.uri()),
        access_token: access_token.map(str::to_string),
        request_timeout_secs: 5,
    };
    ExpoPushDispatcher::new(&config).unwrap()
}

#[tokio::test]
async fn test_batch_is_sent_as_one_json_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/--/api/v2/push/send"))
        .and(header("accept", "application/json"))
        .and(|req: &Request| {
            req.headers
                .get("accept-encoding")
                .and_then(|v| v.to_str().ok())
                == Some("gzip, deflate")
        })
        .and(header("content-type", "application/json"))
        .and(body_json(json!([
            {"to": "ExponentPushToken[a]", "sound": "default", "title": "<3", "body": "❤️🧡💛💚💙!"},
            {"to": "ExponentPushToken[c]", "sound": "default", "title": "<3", "body": "❤️🧡💛💚💙!"}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"status": "ok", "id": "ticket-a"},
                {"status": "ok", "id": "ticket-c"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server, None);
    let report = dispatcher
        .dispatch(&batch(&["ExponentPushToken[a]", "ExponentPushToken[c]"]))
        .await
        .unwrap();

    assert_eq!(report.submitted, 2);
    assert_eq!(report.accepted(), 2);
    assert_eq!(report.rejected(), 0);
}

#[tokio::test]
async fn test_rejected_tickets_are_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"status": "ok", "id": "ticket-a"},
                {
                    "status": "error",
                    "message": "\"ExponentPushToken[b]\" is not a registered push notification recipient",
                    "details": {"error": "DeviceNotRegistered"}
                }
            ]
        })))
        .mount(&server)
        .await;

    let report = dispatcher_for(&server, None)
        .dispatch(&batch(&["ExponentPushToken[a]", "ExponentPushToken[b]"]))
        .await
        .unwrap();

    assert_eq!(report.accepted(), 1);
    assert_eq!(report.rejected(), 1);
    assert_eq!(report.rejection_reasons(), vec!["DeviceNotRegistered"]);
}

#[tokio::test]
async fn test_server_error_is_dispatch_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher_for(&server, None)
        .dispatch(&batch(&["ExponentPushToken[a]"]))
        .await;

    match result {
        Err(PushError::DispatchFailed { message }) => {
            assert!(message.contains("HTTP 500"));
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("Expected DispatchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_request_level_errors_fail_the_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"code": "PUSH_TOO_MANY_EXPERIENCE_IDS", "message": "mixed projects"}]
        })))
        .mount(&server)
        .await;

    let result = dispatcher_for(&server, None)
        .dispatch(&batch(&["ExponentPushToken[a]"]))
        .await;

    match result {
        Err(PushError::DispatchFailed { message }) => {
            assert!(message.contains("PUSH_TOO_MANY_EXPERIENCE_IDS"));
        }
        other => panic!("Expected DispatchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_access_token_is_sent_as_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"status": "ok"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let report = dispatcher_for(&server, Some("secret-token"))
        .dispatch(&batch(&["ExponentPushToken[a]"]))
        .await
        .unwrap();

    assert_eq!(report.accepted(), 1);
}

#[tokio::test]
async fn test_empty_batch_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = dispatcher_for(&server, None).dispatch(&[]).await.unwrap();
    assert_eq!(report.submitted, 0);
}

#[tokio::test]
async fn test_unreachable_gateway_is_dispatch_failure() {
    let config = PushConfig {
        provider: "expo".to_string(),
        url: "http://127.0.0.1:9/--/api/v2/push/send".to_string(),
        access_token: None,
        request_timeout_secs: 2,
    };

    let result = ExpoPushDispatcher::new(&config)
        .unwrap()
        .dispatch(&batch(&["ExponentPushToken[a]"]))
        .await;

    assert!(matches!(result, Err(PushError::DispatchFailed { .. })));
}

#[test]
fn test_unparseable_success_body_counts_as_accepted() {
    let report = parse_send_response(3, "<html>ok</html>").unwrap();
    assert_eq!(report.accepted(), 3);
    assert!(report.tickets.is_empty());
}
