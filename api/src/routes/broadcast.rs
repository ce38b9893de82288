use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use hc_core::domain::entities::PushToken;
use hc_core::errors::DomainError;
use hc_core::repositories::TokenStore;
use hc_core::services::{LocalTokenProvider, NotificationDispatcher};
use hc_shared::ApiResponse;

use super::AppState;
use crate::dto::{BroadcastAcceptedResponse, BroadcastRequest};
use crate::handlers::{domain_error_response, request_id, validation_error_response};

/// Handler for POST /api/v1/broadcast
///
/// Queues a greeting to every registered device except the sender and
/// answers 202 right away. Delivery problems are not reported here; see
/// `GET /api/v1/broadcast/stats`.
///
/// # Request Body
///
/// ```json
/// { "token": "ExponentPushToken[sender]", "title": "<3", "body": "hi" }
/// ```
pub async fn broadcast<S, D, P>(
    req: HttpRequest,
    state: web::Data<AppState<S, D, P>>,
    request: web::Json<BroadcastRequest>,
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

    let payload = request.payload(&state.registry.config().default_payload);
    let sender = match PushToken::parse(request.into_inner().token) {
        Ok(token) => token,
        Err(e) => return domain_error_response(&DomainError::from(e)),
    };

    tracing::info!(
        request_id = %request_id,
        sender = %sender.masked(),
        "Broadcast requested"
    );

    let masked = sender.masked();
    // Detached; the handle is not awaited
    let _ = state.registry.broadcast(sender, payload);

    HttpResponse::Accepted().json(
        ApiResponse::success(BroadcastAcceptedResponse {
            queued: true,
            sender: masked,
        })
        .with_request_id(request_id),
    )
}

/// Handler for GET /api/v1/broadcast/stats
pub async fn broadcast_stats<S, D, P>(
    req: HttpRequest,
    state: web::Data<AppState<S, D, P>>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    D: NotificationDispatcher + 'static,
    P: LocalTokenProvider + 'static,
{
    HttpResponse::Ok()
        .json(ApiResponse::success(state.registry.stats()).with_request_id(request_id(&req)))
}
