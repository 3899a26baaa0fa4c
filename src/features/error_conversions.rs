use bcrypt::BcryptError;
use r2d2::Error as PoolError;
use tower_sessions::session::Error as SessionError;
use validator::ValidationErrors;

use crate::data::models::{ApiError, AuthError, CatalogError, CollectionError, TicketError};

impl From<BcryptError> for AuthError {
    fn from(err: BcryptError) -> Self {
        AuthError::HashingError(err)
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        AuthError::SessionError(err.to_string())
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(err: ValidationErrors) -> Self {
        AuthError::ValidationError(err.to_string())
    }
}

impl From<ValidationErrors> for TicketError {
    fn from(err: ValidationErrors) -> Self {
        TicketError::ValidationError(err.to_string())
    }
}

impl From<PoolError> for ApiError {
    fn from(err: PoolError) -> Self {
        ApiError::Internal(format!("Failed to get DB connection: {err}"))
    }
}

impl From<CollectionError> for CatalogError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::NotFound(e) => CatalogError::NotFound(e),
            CollectionError::InvalidArgument(e) => CatalogError::InvalidArgument(e),
            CollectionError::DatabaseError(e) => CatalogError::DatabaseError(e),
        }
    }
}
