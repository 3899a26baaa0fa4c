use crate::data::models::{ReviewRecord, UserDeck};
use crate::schema::{decks, review_records};
use diesel::prelude::*;

/// Store for per-user review state. Every lookup is scoped by user and deck.
pub struct ReviewRepository;

impl ReviewRepository {
    pub fn find_review_record(
        conn: &mut SqliteConnection,
        user_id: &str,
        deck_id: &str,
        card_id: &str,
    ) -> Result<Option<ReviewRecord>, diesel::result::Error> {
        review_records::table
            .find((user_id, deck_id, card_id))
            .select(ReviewRecord::as_select())
            .first(conn)
            .optional()
    }

    /// All records of one user for one deck, ordered by card id.
    pub fn find_review_records(
        conn: &mut SqliteConnection,
        user_id: &str,
        deck_id: &str,
    ) -> Result<Vec<ReviewRecord>, diesel::result::Error> {
        review_records::table
            .filter(review_records::user_id.eq(user_id))
            .filter(review_records::deck_id.eq(deck_id))
            .order_by(review_records::card_id.asc())
            .select(ReviewRecord::as_select())
            .load(conn)
    }

    /// Inserts new records in a single statement.
    pub fn save_review_records(
        conn: &mut SqliteConnection,
        records: &[ReviewRecord],
    ) -> Result<usize, diesel::result::Error> {
        if records.is_empty() {
            return Ok(0);
        }

        diesel::insert_into(review_records::table)
            .values(records)
            .execute(conn)
    }

    /// Writes the scheduling state of an existing record back.
    pub fn update_review_record(
        conn: &mut SqliteConnection,
        record: &ReviewRecord,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(review_records::table.find((
            &record.user_id,
            &record.deck_id,
            &record.card_id,
        )))
        .set((
            review_records::interval.eq(record.interval),
            review_records::repetitions.eq(record.repetitions),
            review_records::ease_factor.eq(record.ease_factor),
            review_records::last_reviewed.eq(record.last_reviewed),
        ))
        .execute(conn)
    }

    pub fn delete_review_records(
        conn: &mut SqliteConnection,
        user_id: &str,
        deck_id: &str,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(
            review_records::table
                .filter(review_records::user_id.eq(user_id))
                .filter(review_records::deck_id.eq(deck_id)),
        )
        .execute(conn)
    }

    /// Removes the records of every user for the given cards.
    pub fn delete_for_cards(
        conn: &mut SqliteConnection,
        card_ids: &[String],
    ) -> Result<usize, diesel::result::Error> {
        if card_ids.is_empty() {
            return Ok(0);
        }

        diesel::delete(review_records::table.filter(review_records::card_id.eq_any(card_ids)))
            .execute(conn)
    }

    /// Removes the records of every user for the given deck.
    pub fn delete_for_deck(
        conn: &mut SqliteConnection,
        deck_id: &str,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(review_records::table.filter(review_records::deck_id.eq(deck_id)))
            .execute(conn)
    }

    /// Decks the user holds at least one record for, ordered by title.
    pub fn collection_decks(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<Vec<UserDeck>, diesel::result::Error> {
        review_records::table
            .inner_join(decks::table)
            .filter(review_records::user_id.eq(user_id))
            .select((decks::id, decks::title))
            .distinct()
            .order_by((decks::title.asc(), decks::id.asc()))
            .load::<UserDeck>(conn)
    }

    pub fn has_records(
        conn: &mut SqliteConnection,
        user_id: &str,
        deck_id: &str,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(
            review_records::table
                .filter(review_records::user_id.eq(user_id))
                .filter(review_records::deck_id.eq(deck_id)),
        ))
        .get_result(conn)
    }
}
