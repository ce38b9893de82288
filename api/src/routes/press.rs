use actix_web::{web, HttpRequest, HttpResponse};

use hc_core::repositories::TokenStore;
use hc_core::services::{LocalTokenProvider, NotificationDispatcher};
use hc_shared::{error_codes, ApiResponse, ErrorResponse};

use super::AppState;
use crate::dto::BroadcastAcceptedResponse;
use crate::handlers::request_id;

/// Handler for POST /api/v1/press
///
/// The button press of this server's own device: broadcasts the default
/// greeting from the configured device token.
///
/// ## Errors
/// - 409: no device token configured
/// - 503: the device token could not be obtained
pub async fn press<S, D, P>(req: HttpRequest, state: web::Data<AppState<S, D, P>>) -> HttpResponse
where
    S: TokenStore + 'static,
    D: NotificationDispatcher + 'static,
    P: LocalTokenProvider + 'static,
{
    let request_id = request_id(&req);

    let Some(session) = state.session.as_ref() else {
        return HttpResponse::Conflict().json(ErrorResponse::new(
            error_codes::CONFLICT,
            "No device push token configured",
        ));
    };

    match session.press().await {
        Some(_handle) => {
            let sender = session
                .local_token()
                .await
                .map(|t| t.masked())
                .unwrap_or_default();
            tracing::info!(request_id = %request_id, sender = %sender, "Button pressed");
            HttpResponse::Accepted().json(
                ApiResponse::success(BroadcastAcceptedResponse {
                    queued: true,
                    sender,
                })
                .with_request_id(request_id),
            )
        }
        None => HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
            error_codes::TOKEN_UNAVAILABLE,
            "Local push token unavailable",
        )),
    }
}
