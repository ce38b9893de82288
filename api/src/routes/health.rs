use std::collections::HashMap;

use actix_web::{web, HttpResponse};

use hc_core::repositories::TokenStore;
use hc_core::services::{LocalTokenProvider, NotificationDispatcher};
use hc_shared::{HealthResponse, HealthStatus};

use super::AppState;

/// Handler for GET /health
///
/// 200 while the token store answers. A gateway that reports itself
/// unavailable only degrades the status, since registrations still work.
pub async fn health_check<S, D, P>(state: web::Data<AppState<S, D, P>>) -> HttpResponse
where
    S: TokenStore + 'static,
    D: NotificationDispatcher + 'static,
    P: LocalTokenProvider + 'static,
{
    let (store_ok, gateway_ok) = state.registry.health().await;

    let mut services = HashMap::new();
    services.insert(
        "token_store".to_string(),
        if store_ok {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
    );
    services.insert(
        "push_gateway".to_string(),
        if gateway_ok {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
    );

    let response = HealthResponse::from_services(services, env!("CARGO_PKG_VERSION"));

    if response.status == HealthStatus::Unhealthy {
        tracing::warn!(services = ?response.services, "Health check failed");
        HttpResponse::ServiceUnavailable().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}
