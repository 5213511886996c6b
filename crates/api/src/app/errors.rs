//! Response envelope and error -> HTTP status mapping.
//!
//! Every response body is `{"success": true, "data": ...}` or
//! `{"success": false, "error": "..."}`. Database failures never leak
//! details to the caller; the full error goes to the server log.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::json;

use atelier_core::DomainError;
use atelier_infra::InfraError;

pub fn ok(data: impl Serialize) -> axum::response::Response {
    envelope(StatusCode::OK, data)
}

pub fn created(data: impl Serialize) -> axum::response::Response {
    envelope(StatusCode::CREATED, data)
}

pub fn envelope(status: StatusCode, data: impl Serialize) -> axum::response::Response {
    (status, axum::Json(json!({ "success": true, "data": data }))).into_response()
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({ "success": false, "error": message.into() })),
    )
        .into_response()
}

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) | DomainError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidCredentials
        | DomainError::AccountDisabled
        | DomainError::Unauthenticated
        | DomainError::InvalidToken
        | DomainError::TokenExpired
        | DomainError::SessionRevoked
        | DomainError::SessionExpired => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound | DomainError::ProductNotFound => StatusCode::NOT_FOUND,
        DomainError::InsufficientStock { .. }
        | DomainError::InvalidTransition { .. }
        | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::NoRecipe | DomainError::InvalidRecipe(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

pub fn domain_error_response(err: &DomainError) -> axum::response::Response {
    json_error(status_for(err), err.to_string())
}

pub fn infra_error_response(err: &InfraError) -> axum::response::Response {
    match err {
        InfraError::Domain(e) => domain_error_response(e),
        other => {
            tracing::error!(error = %other, "request failed on infrastructure error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_all_map_to_401() {
        for e in [
            DomainError::InvalidCredentials,
            DomainError::Unauthenticated,
            DomainError::InvalidToken,
            DomainError::TokenExpired,
            DomainError::SessionRevoked,
            DomainError::SessionExpired,
            DomainError::AccountDisabled,
        ] {
            assert_eq!(status_for(&e), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn stock_and_transition_conflicts_map_to_409() {
        assert_eq!(
            status_for(&DomainError::insufficient_stock("flour", 2.0, 5.0)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::InvalidTransition {
                from: "delivered".into(),
                to: "draft".into()
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn recipe_problems_map_to_422() {
        assert_eq!(status_for(&DomainError::NoRecipe), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
