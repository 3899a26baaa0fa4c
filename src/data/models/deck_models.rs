use chrono::NaiveDate;
use diesel::result::Error as DieselError;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::schema::{cards, decks};

/// Closed set of deck tags. Stored as a comma separated list of names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Beginner,
    Intermediate,
    Advanced,
    Art,
    Biology,
    Economics,
    History,
    Languages,
    Mathematics,
    Music,
    Philosophy,
    Physics,
}

impl Tag {
    pub const ALL: [Tag; 12] = [
        Tag::Beginner,
        Tag::Intermediate,
        Tag::Advanced,
        Tag::Art,
        Tag::Biology,
        Tag::Economics,
        Tag::History,
        Tag::Languages,
        Tag::Mathematics,
        Tag::Music,
        Tag::Philosophy,
        Tag::Physics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Beginner => "Beginner",
            Tag::Intermediate => "Intermediate",
            Tag::Advanced => "Advanced",
            Tag::Art => "Art",
            Tag::Biology => "Biology",
            Tag::Economics => "Economics",
            Tag::History => "History",
            Tag::Languages => "Languages",
            Tag::Mathematics => "Mathematics",
            Tag::Music => "Music",
            Tag::Philosophy => "Philosophy",
            Tag::Physics => "Physics",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown tag: {0}")]
pub struct UnknownTag(pub String);

impl FromStr for Tag {
    type Err = UnknownTag;

    /// Exact, case-sensitive match on the tag name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

pub fn encode_tags(tags: &[Tag]) -> String {
    tags.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(",")
}

/// Deck row as stored.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Identifiable, Serialize)]
#[diesel(table_name = decks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Deck {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub tags: String,
    pub rating: f64,
    pub rating_count: i64,
    pub modified: NaiveDate,
}

impl Deck {
    /// Stored tags. Names that no longer parse are skipped.
    pub fn tag_list(&self) -> Vec<Tag> {
        self.tags
            .split(',')
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect()
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tag_list().into_iter().map(|t| t.to_string()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Identifiable, Serialize)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Card {
    pub id: String,
    pub deck_id: String,
    pub question: String,
    pub answer: String,
    pub description: Option<String>,
}

/// A deck together with its cards, ordered by card id.
#[derive(Debug, Clone)]
pub struct DeckWithCards {
    pub deck: Deck,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDto {
    pub id: String,
    pub question: String,
    pub description: Option<String>,
    pub answer: String,
}

impl From<Card> for CardDto {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            question: card.question,
            description: card.description,
            answer: card.answer,
        }
    }
}

/// Deck fields a creator may set.
#[derive(Debug, Clone, Deserialize)]
pub struct DeckProperties {
    pub is_public: bool,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<Vec<Tag>>,
}

/// Edit of an existing card.
#[derive(Debug, Clone, Deserialize)]
pub struct CardProperties {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCardRequest {
    pub question: String,
    pub answer: String,
    pub description: Option<String>,
}

/// Payload for both deck creation and deck editing.
#[derive(Debug, Clone, Deserialize)]
pub struct EditedDeckRequest {
    pub deck: DeckProperties,
    #[serde(default)]
    pub cards: Vec<CardProperties>,
    #[serde(default)]
    pub new_cards: Vec<NewCardRequest>,
    #[serde(default)]
    pub removed_cards: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    pub search: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeckBrowserRow {
    pub id: String,
    pub title: String,
    pub rating: f64,
    pub modified: NaiveDate,
    pub cards: usize,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeckView {
    pub id: String,
    pub creator_name: String,
    pub card_count: usize,
    pub modified: NaiveDate,
    pub rating: f64,
    pub tags: Vec<String>,
    pub title: String,
    pub description: Option<String>,
    pub is_owner: bool,
    pub in_collection: bool,
}

#[derive(Debug, Serialize)]
pub struct DeckEditorView {
    pub id: String,
    pub is_public: bool,
    pub card_count: usize,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub title: String,
    pub cards: Vec<CardDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize)]
pub struct UserDeck {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct UserDeckInformation {
    pub decks: Option<Vec<UserDeck>>,
    pub is_logged_in: bool,
}

#[derive(Debug, Serialize)]
pub struct CreatedDeck {
    pub id: String,
}

/// Standard API response format
#[derive(Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Not allowed to edit this deck")]
    Forbidden,
    #[error("Database error")]
    DatabaseError(#[from] DieselError),
}
