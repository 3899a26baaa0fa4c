use thiserror::Error;

use crate::data::models::{AuthError, CatalogError, CollectionError, TicketError};

/// Error type returned by every JSON handler.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Ticket(#[from] TicketError),
    #[error("Internal error: {0}")]
    Internal(String),
}
