use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use uuid::Uuid;

use crate::data::migrations;
use crate::DbPool;
use crate::data::models::{Card, Deck, Tag, encode_tags};
use crate::data::repositories::{DeckRepository, UserRepository};

pub struct TestDb {
    pub conn: SqliteConnection,
    /// A user that owns the seeded decks.
    pub owner: String,
}

/// Fresh in-memory database with the full schema and one deck owner.
pub fn database() -> TestDb {
    let mut conn = SqliteConnection::establish(":memory:").expect("in-memory database");
    migrations::apply_pragmas(&mut conn).expect("pragmas");
    migrations::run_migrations(&mut conn).expect("schema");
    let owner = seed_user(&mut conn, "owner");
    TestDb { conn, owner }
}

/// Single-connection pool over one in-memory database, so every checkout
/// sees the same data.
pub fn pool() -> DbPool {
    let pool = Pool::builder()
        .max_size(1)
        .connection_customizer(Box::new(migrations::SqlitePragmas))
        .build(ConnectionManager::<SqliteConnection>::new(":memory:"))
        .expect("in-memory pool");
    let mut conn = pool.get().expect("pooled connection");
    migrations::run_migrations(&mut conn).expect("schema");
    drop(conn);
    pool
}

pub fn seed_user(conn: &mut SqliteConnection, username: &str) -> String {
    let id = Uuid::new_v4().to_string();
    UserRepository::create_user(conn, &id, username, "not-a-real-hash").expect("seed user");
    id
}

pub fn seed_deck(
    conn: &mut SqliteConnection,
    creator_id: &str,
    title: &str,
    is_public: bool,
    tags: &[Tag],
) -> String {
    let deck = Deck {
        id: Uuid::new_v4().to_string(),
        creator_id: creator_id.to_string(),
        title: title.to_string(),
        description: None,
        is_public,
        tags: encode_tags(tags),
        rating: 0.0,
        rating_count: 0,
        modified: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
    };
    DeckRepository::insert_deck(conn, &deck).expect("seed deck");
    deck.id
}

pub fn seed_card(conn: &mut SqliteConnection, deck_id: &str, question: &str) -> String {
    let card = Card {
        id: Uuid::new_v4().to_string(),
        deck_id: deck_id.to_string(),
        question: question.to_string(),
        answer: format!("answer to {question}"),
        description: None,
    };
    DeckRepository::insert_cards(conn, std::slice::from_ref(&card)).expect("seed card");
    card.id
}

/// Public deck with `count` cards. Returns the deck id and the card ids.
pub fn seed_deck_with_cards(
    conn: &mut SqliteConnection,
    creator_id: &str,
    title: &str,
    count: usize,
) -> (String, Vec<String>) {
    let deck_id = seed_deck(conn, creator_id, title, true, &[]);
    let cards = (0..count)
        .map(|i| seed_card(conn, &deck_id, &format!("{title} question {i}")))
        .collect();
    (deck_id, cards)
}
