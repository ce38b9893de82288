//! Integration tests for the Redis token store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p hc_infra --test redis_integration -- --ignored

use hc_core::domain::entities::{PushToken, TokenRecord};
use hc_core::repositories::TokenStore;
use hc_infra::cache::{CacheConfig, RedisClient};
use hc_infra::store::RedisTokenStore;

async fn store(collection: &str) -> RedisTokenStore {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let client = RedisClient::new(CacheConfig::new(url).with_prefix("heartcast_test"))
        .await
        .expect("Failed to connect to Redis");
    RedisTokenStore::new(client, collection)
}

fn unique_collection() -> String {
    format!("tokes_{}", uuid::Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_redis_connection() {
    let store = store(&unique_collection()).await;
    assert!(store.is_available().await);
    assert!(store.key().starts_with("heartcast_test:tokes_"));
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_register_is_idempotent() {
    let store = store(&unique_collection()).await;
    let token = PushToken::parse("ExponentPushToken[redis-a]").unwrap();

    assert!(store.insert_if_absent(&token).await.unwrap());
    assert!(!store.insert_if_absent(&token).await.unwrap());

    let tokens: Vec<String> = store.list().await.unwrap().into_iter().map(|r| r.token).collect();
    assert_eq!(tokens, vec!["ExponentPushToken[redis-a]".to_string()]);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_concurrent_registrations_collapse() {
    let collection = unique_collection();
    let store = std::sync::Arc::new(store(&collection).await);
    let token = PushToken::parse("ExponentPushToken[redis-race]").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let token = token.clone();
            tokio::spawn(async move { store.insert_if_absent(&token).await.unwrap() })
        })
        .collect();

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_count_ignores_blank_members() {
    let store = store(&unique_collection()).await;
    store
        .add(TokenRecord {
            token: "   ".to_string(),
        })
        .await
        .unwrap();
    store
        .insert_if_absent(&PushToken::parse("ExponentPushToken[redis-b]").unwrap())
        .await
        .unwrap();

    assert_eq!(store.count().await.unwrap(), 1);
}
