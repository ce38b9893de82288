//! HTTP surface tests against the in-memory store and the mock dispatcher

use std::sync::Arc;
use std::time::Duration;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use hc_api::{configure, json_config, AppState};
use hc_core::repositories::InMemoryTokenStore;
use hc_core::services::{
    GreetingSession, RegistryServiceConfig, StaticTokenProvider, TokenRegistryService,
};
use hc_infra::MockDispatcher;

type TestState = AppState<InMemoryTokenStore, MockDispatcher, StaticTokenProvider>;

const LOCAL: &str = "ExponentPushToken[local-device]";

struct Fixture {
    store: Arc<InMemoryTokenStore>,
    dispatcher: Arc<MockDispatcher>,
    state: web::Data<TestState>,
}

fn fixture(tokens: &[&str], device_token: Option<&str>) -> Fixture {
    let store = Arc::new(InMemoryTokenStore::with_tokens(tokens.iter().copied()));
    let dispatcher = Arc::new(MockDispatcher::new());
    let registry = Arc::new(TokenRegistryService::new(
        store.clone(),
        dispatcher.clone(),
        RegistryServiceConfig::default(),
    ));
    let session = device_token.map(|token| {
        Arc::new(GreetingSession::new(
            registry.clone(),
            Arc::new(StaticTokenProvider::new(Some(token.to_string()))),
        ))
    });

    Fixture {
        store,
        dispatcher,
        state: web::Data::new(AppState::new(registry, session)),
    }
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .app_data(json_config())
                .configure(configure::<InMemoryTokenStore, MockDispatcher, StaticTokenProvider>),
        )
        .await
    };
}

/// Poll the stats endpoint until `field` reaches `expected`
macro_rules! wait_for_stat {
    ($app:expr, $field:expr, $expected:expr) => {{
        let mut last = Value::Null;
        for _ in 0..100 {
            let req = test::TestRequest::get()
                .uri("/api/v1/broadcast/stats")
                .to_request();
            let body: Value = test::call_and_read_body_json(&$app, req).await;
            last = body["data"].clone();
            if last[$field] == json!($expected) {
                break;
            }
            actix_rt::time::sleep(Duration::from_millis(10)).await;
        }
        last
    }};
}

#[actix_rt::test]
async fn test_register_token_is_idempotent() {
    let fx = fixture(&[], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens")
        .set_json(json!({ "token": "ExponentPushToken[aaa]" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["registered"], true);

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens")
        .set_json(json!({ "token": "ExponentPushToken[aaa]" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["registered"], false);

    assert_eq!(fx.store.tokens().await, vec!["ExponentPushToken[aaa]".to_string()]);
}

#[actix_rt::test]
async fn test_register_echoes_request_id() {
    let fx = fixture(&[], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens")
        .insert_header(("x-request-id", "req-42"))
        .set_json(json!({ "token": "ExponentPushToken[aaa]" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["request_id"], "req-42");
}

#[actix_rt::test]
async fn test_register_rejects_empty_token() {
    let fx = fixture(&[], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens")
        .set_json(json!({ "token": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["token"].is_array());

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens")
        .set_json(json!({ "token": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(fx.store.tokens().await.is_empty());
}

#[actix_rt::test]
async fn test_malformed_json_is_bad_request() {
    let fx = fixture(&[], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"token\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_rt::test]
async fn test_register_with_store_down_is_unavailable() {
    let fx = fixture(&[], None);
    fx.store.set_unavailable(true);
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/tokens")
        .set_json(json!({ "token": "ExponentPushToken[aaa]" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "STORE_UNAVAILABLE");
}

#[actix_rt::test]
async fn test_token_count_ignores_duplicates() {
    let fx = fixture(&["A", "B", "A"], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::get().uri("/api/v1/tokens/count").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["count"], 2);
}

#[actix_rt::test]
async fn test_broadcast_excludes_sender() {
    let fx = fixture(&["A", "B", "C"], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/broadcast")
        .set_json(json!({ "token": "B" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["queued"], true);

    let stats = wait_for_stat!(app, "broadcasts_delivered", 1);
    assert_eq!(stats["broadcasts_delivered"], 1);
    assert_eq!(stats["messages_accepted"], 2);
    assert_eq!(fx.dispatcher.get_batch_count(), 1);
    assert_eq!(fx.dispatcher.get_message_count(), 2);
}

#[actix_rt::test]
async fn test_broadcast_with_no_other_devices_sends_nothing() {
    let fx = fixture(&["A"], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/broadcast")
        .set_json(json!({ "token": "A", "title": "hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let stats = wait_for_stat!(app, "broadcasts_empty", 1);
    assert_eq!(stats["broadcasts_empty"], 1);
    assert_eq!(fx.dispatcher.get_batch_count(), 0);
}

#[actix_rt::test]
async fn test_broadcast_is_accepted_even_when_store_is_down() {
    let fx = fixture(&["A", "B"], None);
    fx.store.set_unavailable(true);
    let app = init_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/v1/broadcast")
        .set_json(json!({ "token": "A" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let stats = wait_for_stat!(app, "broadcasts_failed", 1);
    assert_eq!(stats["broadcasts_failed"], 1);
    assert!(stats["last_error"].is_string());
}

#[actix_rt::test]
async fn test_press_without_device_token_is_conflict() {
    let fx = fixture(&["A"], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::post().uri("/api/v1/press").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_press_broadcasts_from_device_token() {
    let fx = fixture(&["A", LOCAL, "C"], Some(LOCAL));
    let app = init_app!(fx.state);

    let req = test::TestRequest::post().uri("/api/v1/press").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["queued"], true);
    assert_ne!(body["data"]["sender"], LOCAL);

    let stats = wait_for_stat!(app, "broadcasts_delivered", 1);
    assert_eq!(stats["messages_accepted"], 2);
}

#[actix_rt::test]
async fn test_press_with_invalid_device_token_is_unavailable() {
    let fx = fixture(&["A"], Some("   "));
    let app = init_app!(fx.state);

    let req = test::TestRequest::post().uri("/api/v1/press").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(fx.dispatcher.get_batch_count(), 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/broadcast/stats")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["presses_without_token"], 1);
    assert_eq!(body["data"]["registration_failures"], 0);
}

#[actix_rt::test]
async fn test_health_reports_store_status() {
    let fx = fixture(&[], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["token_store"], "healthy");

    fx.store.set_unavailable(true);
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_rt::test]
async fn test_unknown_route_is_not_found() {
    let fx = fixture(&[], None);
    let app = init_app!(fx.state);

    let req = test::TestRequest::get().uri("/api/v2/nothing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}
