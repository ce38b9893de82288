use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use hc_core::domain::entities::PushToken;
use hc_core::errors::DomainError;
use hc_core::repositories::TokenStore;
use hc_core::services::{LocalTokenProvider, NotificationDispatcher};
use hc_shared::ApiResponse;

use super::AppState;
use crate::dto::{RegisterTokenRequest, RegisterTokenResponse, TokenCountResponse};
use crate::handlers::{domain_error_response, request_id, validation_error_response};

/// Handler for POST /api/v1/tokens
///
/// Registers a device token once. Repeated calls with the same token are
/// answered with `registered: false` and leave the store unchanged.
///
/// # Request Body
///
/// ```json
/// { "token": "ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "success": true, "data": { "registered": true }, "timestamp": "...", "request_id": "..." }
/// ```
///
/// ## Errors
/// - 400: missing or blank token
/// - 503: token store unavailable
pub async fn register_token<S, D, P>(
    req: HttpRequest,
    state: web::Data<AppState<S, D, P>>,
    request: web::Json<RegisterTokenRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    D: NotificationDispatcher + 'static,
    P: LocalTokenProvider + 'static,
{
    let request_id = request_id(&req);

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let token = match PushToken::parse(request.into_inner().token) {
        Ok(token) => token,
        Err(e) => return domain_error_response(&DomainError::from(e)),
    };

    tracing::info!(
        request_id = %request_id,
        token = %token.masked(),
        expo_format = token.is_expo_format(),
        "Processing token registration"
    );

    match state.registry.register(&token).await {
        Ok(registered) => HttpResponse::Ok().json(
            ApiResponse::success(RegisterTokenResponse { registered }).with_request_id(request_id),
        ),
        Err(e) => domain_error_response(&e),
    }
}

/// Handler for GET /api/v1/tokens/count
pub async fn token_count<S, D, P>(
    req: HttpRequest,
    state: web::Data<AppState<S, D, P>>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    D: NotificationDispatcher + 'static,
    P: LocalTokenProvider + 'static,
{
    match state.registry.registered_count().await {
        Ok(count) => HttpResponse::Ok().json(
            ApiResponse::success(TokenCountResponse { count }).with_request_id(request_id(&req)),
        ),
        Err(e) => domain_error_response(&e),
    }
}
