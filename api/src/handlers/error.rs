//! Mapping from domain failures to HTTP error responses

use actix_web::{HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::ValidationErrors;

use hc_core::errors::{DomainError, PushError};
use hc_shared::{error_codes, ErrorResponse};

/// Request id from `x-request-id`, or a fresh one
pub fn request_id(req: &HttpRequest) -> String {
    req.headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// - validation → 400
/// - token store or local token unavailable → 503
/// - gateway failure → 502
/// - anything else → 500
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Validation(e) => {
            tracing::warn!(error = %e, "Request rejected");
            HttpResponse::BadRequest()
                .json(ErrorResponse::new(error_codes::VALIDATION_ERROR, e.to_string()))
        }
        DomainError::Push(push_error) => {
            tracing::error!(error = %push_error, code = push_error.code(), "Request failed");
            let body = ErrorResponse::new(push_error.code(), push_error.to_string());
            match push_error {
                PushError::StoreUnavailable { .. } | PushError::TokenUnavailable { .. } => {
                    HttpResponse::ServiceUnavailable().json(body)
                }
                PushError::DispatchFailed { .. } => HttpResponse::BadGateway().json(body),
            }
        }
        DomainError::Internal { .. } => {
            tracing::error!(error = %error, "Internal error");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            ))
        }
    }
}

/// 400 with one detail entry per invalid field
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field.to_string(), messages);
    }

    tracing::warn!(details = ?response.details, "Validation failed");
    HttpResponse::BadRequest().json(response)
}
