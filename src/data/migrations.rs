use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool};

use crate::DbPool;

/// Foreign keys carry no `ON DELETE CASCADE`: dependents are removed
/// explicitly before their parent, so a missed cleanup fails loudly.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    card_color TEXT NOT NULL DEFAULT 'white'
);

CREATE TABLE IF NOT EXISTS decks (
    id TEXT PRIMARY KEY NOT NULL,
    creator_id TEXT NOT NULL REFERENCES users(id),
    title TEXT NOT NULL,
    description TEXT,
    is_public BOOLEAN NOT NULL DEFAULT 0,
    tags TEXT NOT NULL DEFAULT '',
    rating DOUBLE NOT NULL DEFAULT 0,
    rating_count BIGINT NOT NULL DEFAULT 0,
    modified DATE NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_decks_creator ON decks(creator_id);

CREATE TABLE IF NOT EXISTS cards (
    id TEXT PRIMARY KEY NOT NULL,
    deck_id TEXT NOT NULL REFERENCES decks(id),
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    description TEXT
);
CREATE INDEX IF NOT EXISTS idx_cards_deck ON cards(deck_id);

CREATE TABLE IF NOT EXISTS review_records (
    user_id TEXT NOT NULL REFERENCES users(id),
    deck_id TEXT NOT NULL REFERENCES decks(id),
    card_id TEXT NOT NULL REFERENCES cards(id),
    interval INTEGER NOT NULL DEFAULT 1,
    repetitions INTEGER NOT NULL DEFAULT 0,
    ease_factor DOUBLE NOT NULL DEFAULT 2.5,
    last_reviewed TIMESTAMP NOT NULL,
    PRIMARY KEY (user_id, deck_id, card_id)
);
CREATE INDEX IF NOT EXISTS idx_review_records_deck ON review_records(deck_id);
CREATE INDEX IF NOT EXISTS idx_review_records_card ON review_records(card_id);

CREATE TABLE IF NOT EXISTS tickets (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL REFERENCES users(id),
    ticket_type TEXT NOT NULL,
    title TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS ticket_comments (
    id TEXT PRIMARY KEY NOT NULL,
    ticket_id TEXT NOT NULL REFERENCES tickets(id),
    user_id TEXT NOT NULL REFERENCES users(id),
    value TEXT NOT NULL,
    position INTEGER NOT NULL,
    created_at TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_ticket_comments_ticket ON ticket_comments(ticket_id, position);
"#;

const PRAGMAS: &str = "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";

/// Applied to every connection handed out by the pool.
#[derive(Debug)]
pub(crate) struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(PRAGMAS).map_err(r2d2::Error::QueryError)
    }
}

pub fn apply_pragmas(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(PRAGMAS)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(SCHEMA)
}

pub fn init_pool(database_url: &str) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
}
