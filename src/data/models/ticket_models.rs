use chrono::NaiveDateTime;
use diesel::result::Error as DieselError;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

use crate::schema::{ticket_comments, tickets};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketType {
    Active,
    Closed,
}

impl TicketType {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketType::Active => "Active",
            TicketType::Closed => "Closed",
        }
    }
}

impl FromStr for TicketType {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(TicketType::Active),
            "Closed" => Ok(TicketType::Closed),
            other => Err(TicketError::Corrupt(format!("unknown ticket type {other}"))),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TicketRow {
    pub id: String,
    pub user_id: String,
    pub ticket_type: String,
    pub title: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ticket_comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TicketCommentRow {
    pub id: String,
    pub ticket_id: String,
    pub user_id: String,
    pub value: String,
    pub position: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketCommentDto {
    pub id: String,
    pub user_id: String,
    pub value: String,
}

impl From<TicketCommentRow> for TicketCommentDto {
    fn from(row: TicketCommentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            value: row.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDto {
    pub id: String,
    pub user_id: String,
    pub ticket_type: TicketType,
    pub title: String,
    pub ticket_comments: Vec<TicketCommentDto>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TicketForCreation {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub value: String,
}

#[derive(Error, Debug)]
pub enum TicketError {
    #[error("Ticket not found")]
    NotFound,
    #[error("{0}")]
    ValidationError(String),
    #[error("Stored ticket is invalid: {0}")]
    Corrupt(String),
    #[error("Database error")]
    DatabaseError(#[from] DieselError),
}
