//! Unit tests for the registry service

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{NotificationPayload, PushToken};
use crate::domain::value_objects::{BroadcastOutcome, BroadcastStatus};
use crate::errors::{DomainError, PushError};
use crate::repositories::InMemoryTokenStore;
use crate::services::registry::{build_batch, RegistryServiceConfig, TokenRegistryService};

use super::mocks::MockDispatcher;

fn token(value: &str) -> PushToken {
    PushToken::parse(value).unwrap()
}

fn service_with(
    store: InMemoryTokenStore,
    dispatcher: MockDispatcher,
) -> (
    TokenRegistryService<InMemoryTokenStore, MockDispatcher>,
    Arc<InMemoryTokenStore>,
    Arc<MockDispatcher>,
) {
    let store = Arc::new(store);
    let dispatcher = Arc::new(dispatcher);
    let service = TokenRegistryService::new(
        store.clone(),
        dispatcher.clone(),
        RegistryServiceConfig::default(),
    );
    (service, store, dispatcher)
}

#[tokio::test]
async fn test_register_into_empty_store() {
    let (service, store, _) = service_with(InMemoryTokenStore::new(), MockDispatcher::new(false));

    let inserted = service.register(&token("A")).await.unwrap();

    assert!(inserted);
    assert_eq!(store.tokens().await, vec!["A".to_string()]);
}

#[tokio::test]
async fn test_register_twice_keeps_one_record() {
    let (service, store, _) =
        service_with(InMemoryTokenStore::with_tokens(["A"]), MockDispatcher::new(false));

    assert!(!service.register(&token("A")).await.unwrap());
    assert!(!service.register(&token("A")).await.unwrap());

    assert_eq!(store.tokens().await, vec!["A".to_string()]);
    assert_eq!(store.write_count(), 0);
    assert_eq!(service.stats().registrations, 2);
}

#[tokio::test]
async fn test_register_store_failure_is_reported_and_counted() {
    let store = InMemoryTokenStore::new();
    store.set_unavailable(true);
    let (service, _, _) = service_with(store, MockDispatcher::new(false));

    let result = service.register(&token("A")).await;

    assert!(matches!(
        result,
        Err(DomainError::Push(PushError::StoreUnavailable { .. }))
    ));
    let stats = service.stats();
    assert_eq!(stats.registration_failures, 1);
    assert!(stats.last_error.unwrap().contains("Token store unavailable"));
}

#[tokio::test]
async fn test_broadcast_excludes_local_token() {
    let (service, _, dispatcher) = service_with(
        InMemoryTokenStore::with_tokens(["A", "B", "C"]),
        MockDispatcher::new(false),
    );

    let outcome = service
        .broadcast(token("B"), NotificationPayload::default())
        .outcome()
        .await;

    assert_eq!(outcome.status(), BroadcastStatus::Delivered);
    assert_eq!(outcome.recipients(), 2);

    let batches = dispatcher.batches();
    assert_eq!(batches.len(), 1, "whole batch goes out in one request");
    let recipients: HashSet<String> = dispatcher.recipients_of_last_batch().into_iter().collect();
    assert_eq!(
        recipients,
        ["A", "C"].iter().map(|s| s.to_string()).collect::<HashSet<_>>()
    );
}

#[tokio::test]
async fn test_broadcast_batch_is_complete_and_uniform() {
    let tokens: Vec<String> = (0..10).map(|i| format!("ExponentPushToken[{}]", i)).collect();
    let local = token(&tokens[3]);
    let (service, _, dispatcher) = service_with(
        InMemoryTokenStore::with_tokens(tokens.clone()),
        MockDispatcher::new(false),
    );

    let payload = NotificationPayload::new("hi", "there");
    service.broadcast(local.clone(), payload.clone()).outcome().await;

    let batch = dispatcher.batches().pop().unwrap();
    assert_eq!(batch.len(), tokens.len() - 1);
    assert!(batch.iter().all(|m| m.title == "hi" && m.body == "there" && m.sound == "default"));
    assert!(batch.iter().all(|m| m.to != local.as_str()));

    let distinct: HashSet<&str> = batch.iter().map(|m| m.to.as_str()).collect();
    assert_eq!(distinct.len(), batch.len());
}

#[tokio::test]
async fn test_broadcast_deduplicates_legacy_records() {
    let (service, _, dispatcher) = service_with(
        InMemoryTokenStore::with_tokens(["A", "C", "A", "", "B"]),
        MockDispatcher::new(false),
    );

    service.broadcast_default(token("B")).outcome().await;

    assert_eq!(
        dispatcher.recipients_of_last_batch(),
        vec!["A".to_string(), "C".to_string()]
    );
}

#[tokio::test]
async fn test_broadcast_with_no_other_devices_sends_nothing() {
    let (service, _, dispatcher) =
        service_with(InMemoryTokenStore::with_tokens(["A"]), MockDispatcher::new(false));

    let outcome = service.broadcast_default(token("A")).outcome().await;

    assert_eq!(outcome, BroadcastOutcome::Empty);
    assert!(dispatcher.batches().is_empty());
    assert_eq!(service.stats().broadcasts_empty, 1);
}

#[tokio::test]
async fn test_dispatcher_failure_does_not_reach_caller() {
    let (service, _, dispatcher) = service_with(
        InMemoryTokenStore::with_tokens(["A", "B"]),
        MockDispatcher::new(true),
    );

    // broadcast() itself has no error path
    let handle = service.broadcast_default(token("A"));
    let outcome = handle.outcome().await;

    assert!(outcome.is_failure());
    assert_eq!(dispatcher.batches().len(), 1);

    let stats = service.stats();
    assert_eq!(stats.broadcasts_started, 1);
    assert_eq!(stats.broadcasts_failed, 1);
    assert!(stats.last_error.unwrap().contains("HTTP 500"));
}

#[tokio::test]
async fn test_store_failure_during_broadcast_is_recorded() {
    let store = InMemoryTokenStore::with_tokens(["A", "B"]);
    store.set_unavailable(true);
    let (service, _, dispatcher) = service_with(store, MockDispatcher::new(false));

    let outcome = service.broadcast_default(token("A")).outcome().await;

    match outcome {
        BroadcastOutcome::Failed { recipients, error } => {
            assert_eq!(recipients, 0);
            assert!(matches!(error, PushError::StoreUnavailable { .. }));
        }
        other => panic!("Expected failure, got {:?}", other),
    }
    assert!(dispatcher.batches().is_empty());
}

#[tokio::test]
async fn test_partial_rejection_is_counted() {
    let (service, _, _) = service_with(
        InMemoryTokenStore::with_tokens(["A", "B", "C"]),
        MockDispatcher::rejecting(&["C"]),
    );

    let outcome = service.broadcast_default(token("A")).outcome().await;

    assert_eq!(outcome.status(), BroadcastStatus::Partial);
    let stats = service.stats();
    assert_eq!(stats.broadcasts_partial, 1);
    assert_eq!(stats.messages_accepted, 1);
    assert_eq!(stats.messages_rejected, 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_gateway_times_out() {
    let store = Arc::new(InMemoryTokenStore::with_tokens(["A", "B"]));
    let dispatcher = Arc::new(MockDispatcher::slow(Duration::from_secs(120)));
    let service = TokenRegistryService::new(
        store,
        dispatcher,
        RegistryServiceConfig {
            dispatch_timeout: Duration::from_secs(5),
            ..Default::default()
        },
    );

    let outcome = service.broadcast_default(token("A")).outcome().await;

    match outcome {
        BroadcastOutcome::Failed { error, .. } => {
            assert!(matches!(error, PushError::DispatchFailed { .. }));
        }
        other => panic!("Expected timeout failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recipients_query() {
    let (service, _, _) = service_with(
        InMemoryTokenStore::with_tokens(["A", "B", "C"]),
        MockDispatcher::new(false),
    );

    let recipients = service.recipients(&token("C")).await.unwrap();
    assert_eq!(recipients, vec![token("A"), token("B")]);
    assert_eq!(service.registered_count().await.unwrap(), 3);
}

#[test]
fn test_build_batch() {
    let batch = build_batch(&[token("A"), token("C")], &NotificationPayload::default());
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].to, "A");
    assert_eq!(batch[1].to, "C");
    assert!(batch.iter().all(|m| m.title == "<3"));
}
