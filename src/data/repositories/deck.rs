use std::collections::HashMap;

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::data::models::{Card, CardProperties, Deck, DeckProperties, DeckWithCards, UserDeck, encode_tags};
use crate::schema::{cards, decks, users};

/// Narrowing applied by [`DeckRepository::visible_decks`].
#[derive(Debug, Default, Clone)]
pub struct DeckQuery<'a> {
    pub ids: Option<&'a [String]>,
    pub requester_id: Option<&'a str>,
}

pub struct DeckRepository;

impl DeckRepository {
    pub fn find_deck(
        conn: &mut SqliteConnection,
        deck_id: &str,
    ) -> Result<Option<Deck>, diesel::result::Error> {
        decks::table
            .find(deck_id)
            .select(Deck::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_deck_with_cards(
        conn: &mut SqliteConnection,
        deck_id: &str,
    ) -> Result<Option<DeckWithCards>, diesel::result::Error> {
        let Some(deck) = Self::find_deck(conn, deck_id)? else {
            return Ok(None);
        };

        let cards = cards::table
            .filter(cards::deck_id.eq(deck_id))
            .order_by(cards::id.asc())
            .select(Card::as_select())
            .load(conn)?;

        Ok(Some(DeckWithCards { deck, cards }))
    }

    /// Cards with the given ids, ordered by id. Unknown ids are skipped.
    pub fn find_cards_by_ids(
        conn: &mut SqliteConnection,
        ids: &[String],
    ) -> Result<Vec<Card>, diesel::result::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        cards::table
            .filter(cards::id.eq_any(ids))
            .order_by(cards::id.asc())
            .select(Card::as_select())
            .load(conn)
    }

    /// Decks that are public or owned by the requester, narrowed by `query`.
    pub fn visible_decks(
        conn: &mut SqliteConnection,
        query: &DeckQuery<'_>,
    ) -> Result<Vec<Deck>, diesel::result::Error> {
        let mut statement = decks::table.select(Deck::as_select()).into_boxed();

        statement = match query.requester_id {
            Some(requester) => statement.filter(
                decks::is_public
                    .eq(true)
                    .or(decks::creator_id.eq(requester.to_string())),
            ),
            None => statement.filter(decks::is_public.eq(true)),
        };

        if let Some(ids) = query.ids.filter(|ids| !ids.is_empty()) {
            statement = statement.filter(decks::id.eq_any(ids.to_vec()));
        }

        statement.order_by(decks::id.asc()).load(conn)
    }

    pub fn card_counts(
        conn: &mut SqliteConnection,
        deck_ids: &[String],
    ) -> Result<HashMap<String, usize>, diesel::result::Error> {
        if deck_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let counts = cards::table
            .filter(cards::deck_id.eq_any(deck_ids))
            .group_by(cards::deck_id)
            .select((cards::deck_id, diesel::dsl::count_star()))
            .load::<(String, i64)>(conn)?;

        Ok(counts
            .into_iter()
            .map(|(id, count)| (id, usize::try_from(count).unwrap_or_default()))
            .collect())
    }

    pub fn creator_name(
        conn: &mut SqliteConnection,
        creator_id: &str,
    ) -> Result<Option<String>, diesel::result::Error> {
        users::table
            .find(creator_id)
            .select(users::username)
            .first(conn)
            .optional()
    }

    pub fn user_decks(
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<Vec<UserDeck>, diesel::result::Error> {
        decks::table
            .filter(decks::creator_id.eq(user_id))
            .order_by((decks::title.asc(), decks::id.asc()))
            .select((decks::id, decks::title))
            .load::<UserDeck>(conn)
    }

    pub fn insert_deck(
        conn: &mut SqliteConnection,
        deck: &Deck,
    ) -> Result<usize, diesel::result::Error> {
        diesel::insert_into(decks::table).values(deck).execute(conn)
    }

    pub fn insert_cards(
        conn: &mut SqliteConnection,
        new_cards: &[Card],
    ) -> Result<usize, diesel::result::Error> {
        if new_cards.is_empty() {
            return Ok(0);
        }

        diesel::insert_into(cards::table)
            .values(new_cards)
            .execute(conn)
    }

    pub fn update_deck(
        conn: &mut SqliteConnection,
        deck_id: &str,
        properties: &DeckProperties,
        modified: NaiveDate,
    ) -> Result<usize, diesel::result::Error> {
        let tags = encode_tags(properties.tags.as_deref().unwrap_or_default());

        diesel::update(decks::table.find(deck_id))
            .set((
                decks::title.eq(&properties.title),
                decks::description.eq(&properties.description),
                decks::is_public.eq(properties.is_public),
                decks::tags.eq(tags),
                decks::modified.eq(modified),
            ))
            .execute(conn)
    }

    /// Only touches the card if it belongs to `deck_id`.
    pub fn update_card(
        conn: &mut SqliteConnection,
        deck_id: &str,
        card: &CardProperties,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(
            cards::table
                .filter(cards::id.eq(card.id.to_string()))
                .filter(cards::deck_id.eq(deck_id)),
        )
        .set((
            cards::question.eq(&card.question),
            cards::answer.eq(&card.answer),
            cards::description.eq(&card.description),
        ))
        .execute(conn)
    }

    /// Only deletes cards that belong to `deck_id`. Review records must be
    /// removed first.
    pub fn delete_cards(
        conn: &mut SqliteConnection,
        deck_id: &str,
        card_ids: &[String],
    ) -> Result<usize, diesel::result::Error> {
        if card_ids.is_empty() {
            return Ok(0);
        }

        diesel::delete(
            cards::table
                .filter(cards::deck_id.eq(deck_id))
                .filter(cards::id.eq_any(card_ids)),
        )
        .execute(conn)
    }

    /// Deletes the deck and its cards. Review records must be removed first.
    pub fn delete_deck(
        conn: &mut SqliteConnection,
        deck_id: &str,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(cards::table.filter(cards::deck_id.eq(deck_id))).execute(conn)?;
        diesel::delete(decks::table.find(deck_id)).execute(conn)
    }

    /// Ids of the cards among `card_ids` that belong to `deck_id`.
    pub fn card_ids_in_deck(
        conn: &mut SqliteConnection,
        deck_id: &str,
        card_ids: &[String],
    ) -> Result<Vec<String>, diesel::result::Error> {
        if card_ids.is_empty() {
            return Ok(Vec::new());
        }

        cards::table
            .filter(cards::deck_id.eq(deck_id))
            .filter(cards::id.eq_any(card_ids))
            .select(cards::id)
            .load(conn)
    }
}
