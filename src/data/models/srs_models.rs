use chrono::NaiveDateTime;
use diesel::result::Error as DieselError;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::models::CardDto;
use crate::schema::review_records;

/// Spaced-repetition state of one card for one user.
///
/// Keyed by the full (user, deck, card) triple; there is no surrogate id.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = review_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReviewRecord {
    pub user_id: String,
    pub deck_id: String,
    pub card_id: String,
    /// Days until the next review, never below 1.
    pub interval: i32,
    /// Consecutive successful recalls.
    pub repetitions: i32,
    pub ease_factor: f64,
    /// UTC.
    pub last_reviewed: NaiveDateTime,
}

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Database error")]
    DatabaseError(#[from] DieselError),
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub quality: i32,
}

#[derive(Debug, Serialize)]
pub struct DueCardsResponse {
    pub cards: Vec<CardDto>,
    pub color: String,
}
