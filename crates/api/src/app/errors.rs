use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use relaycrm_core::DomainError;
use relaycrm_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "entity store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        e @ DomainError::DuplicateEmail(_) => {
            json_error(StatusCode::CONFLICT, "duplicate_email", e.to_string())
        }
        e @ DomainError::InvalidCustomer(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_customer", e.to_string())
        }
        e @ DomainError::InvalidProducts => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_products", e.to_string())
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
