//! Route table and request extractors
//!
//! `configure` registers every HTTP route against a concrete
//! `AppState<S, D, P>`. The binary and the integration tests both build
//! their `App` through it, so they always see the same routing.

use actix_web::{error::InternalError, web, HttpRequest, HttpResponse};

use hc_core::repositories::TokenStore;
use hc_core::services::{LocalTokenProvider, NotificationDispatcher};
use hc_shared::{error_codes, ErrorResponse};

use crate::routes::{broadcast, health, press, tokens};

/// Largest accepted JSON body in bytes
pub const JSON_LIMIT: usize = 16 * 1024;

/// Register all routes for the given state type
pub fn configure<S, D, P>(cfg: &mut web::ServiceConfig)
where
    S: TokenStore + 'static,
    D: NotificationDispatcher + 'static,
    P: LocalTokenProvider + 'static,
{
    cfg.route("/health", web::get().to(health::health_check::<S, D, P>))
        .service(
            web::scope("/api/v1")
                .route("/tokens", web::post().to(tokens::register_token::<S, D, P>))
                .route("/tokens/count", web::get().to(tokens::token_count::<S, D, P>))
                .route("/broadcast", web::post().to(broadcast::broadcast::<S, D, P>))
                .route(
                    "/broadcast/stats",
                    web::get().to(broadcast::broadcast_stats::<S, D, P>),
                )
                .route("/press", web::post().to(press::press::<S, D, P>))
                .route("/", web::get().to(api_documentation)),
        )
        .default_service(web::route().to(not_found));
}

/// JSON extractor settings: size limit and an `ErrorResponse` body for
/// malformed payloads
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req: &HttpRequest| {
            let body = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string());
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "HeartCast API v1",
        "endpoints": {
            "health": "/health",
            "register_token": {
                "path": "/api/v1/tokens",
                "method": "POST",
                "request_body": { "token": "string (1-4096 chars)" },
                "responses": {
                    "200": "{ registered: bool }",
                    "400": "Missing or blank token",
                    "503": "Token store unavailable"
                }
            },
            "token_count": {
                "path": "/api/v1/tokens/count",
                "method": "GET"
            },
            "broadcast": {
                "path": "/api/v1/broadcast",
                "method": "POST",
                "request_body": {
                    "token": "sender token, excluded from recipients",
                    "title": "optional string",
                    "body": "optional string"
                },
                "responses": {
                    "202": "Broadcast queued",
                    "400": "Invalid request"
                }
            },
            "press": {
                "path": "/api/v1/press",
                "method": "POST",
                "responses": {
                    "202": "Broadcast queued from the device token",
                    "409": "No device token configured",
                    "503": "Device token unavailable"
                }
            },
            "broadcast_stats": {
                "path": "/api/v1/broadcast/stats",
                "method": "GET"
            }
        }
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
