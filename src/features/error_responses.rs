use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::data::models::{ApiError, AuthError, CatalogError, CollectionError, TicketError};

fn error_response(status: StatusCode, message: String) -> Response {
    let body = json!({
        "error": message,
        "status": status.as_u16()
    });

    (status, axum::Json(body)).into_response()
}

/// Logs the detail and hides it from the client.
fn internal(detail: impl std::fmt::Display, message: &str) -> (StatusCode, String) {
    log::error!("{message}: {detail}");
    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::NotLoggedIn => (StatusCode::UNAUTHORIZED, self.to_string()),
            AuthError::UsernameTaken => (StatusCode::CONFLICT, self.to_string()),
            AuthError::ValidationError(e) => (StatusCode::BAD_REQUEST, e),
            AuthError::DatabaseError(e) => internal(e, "Database error"),
            AuthError::HashingError(e) => internal(e, "Hashing error"),
            AuthError::SessionError(e) => internal(e, "Session error"),
        };

        error_response(status, message)
    }
}

impl IntoResponse for CollectionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CollectionError::NotFound(e) => (StatusCode::NOT_FOUND, e),
            CollectionError::InvalidArgument(e) => (StatusCode::BAD_REQUEST, e),
            CollectionError::DatabaseError(e) => internal(e, "Database error"),
        };

        error_response(status, message)
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CatalogError::NotFound(e) => (StatusCode::NOT_FOUND, e),
            CatalogError::InvalidArgument(e) => (StatusCode::BAD_REQUEST, e),
            CatalogError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            CatalogError::DatabaseError(e) => internal(e, "Database error"),
        };

        error_response(status, message)
    }
}

impl IntoResponse for TicketError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            TicketError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            TicketError::ValidationError(e) => (StatusCode::BAD_REQUEST, e),
            TicketError::Corrupt(e) => internal(e, "Stored ticket is invalid"),
            TicketError::DatabaseError(e) => internal(e, "Database error"),
        };

        error_response(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(e) => e.into_response(),
            ApiError::Collection(e) => e.into_response(),
            ApiError::Catalog(e) => e.into_response(),
            ApiError::Ticket(e) => e.into_response(),
            ApiError::Internal(e) => {
                let (status, message) = internal(e, "Internal error");
                error_response(status, message)
            }
        }
    }
}
