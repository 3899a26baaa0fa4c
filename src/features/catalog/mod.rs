pub mod filter;

use chrono::{NaiveDate, Utc};
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::data::models::{
    Card, CardDto, CatalogError, Deck, DeckBrowserRow, DeckEditorView, DeckView, EditedDeckRequest,
    UserDeck, encode_tags,
};
use crate::data::repositories::{DeckQuery, DeckRepository, ReviewRepository};
use crate::features::srs::CollectionManager;

const DELETED_CREATOR: &str = "deleted";

/// Deck and card content: browsing, viewing and editing.
pub struct DeckCatalog<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> DeckCatalog<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Decks visible to `requester` (public ones plus their own), narrowed
    /// by id, case-insensitive title substring and tags. Every selected tag
    /// must be on the deck; an unknown tag name yields no decks at all.
    pub fn filter(
        &mut self,
        ids: &[Uuid],
        title_substring: Option<&str>,
        tags: &[String],
        requester: Option<Uuid>,
    ) -> Result<Vec<Deck>, CatalogError> {
        let Some(selected_tags) = filter::parse_tags(tags) else {
            return Ok(Vec::new());
        };

        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let requester = requester.map(|id| id.to_string());
        let query = DeckQuery {
            ids: Some(ids.as_slice()),
            requester_id: requester.as_deref(),
        };

        Ok(DeckRepository::visible_decks(self.conn, &query)?
            .into_iter()
            .filter(|deck| filter::title_contains(deck, title_substring))
            .filter(|deck| filter::has_all_tags(deck, &selected_tags))
            .collect())
    }

    /// Filtered decks in browser order.
    pub fn browse(
        &mut self,
        title_substring: Option<&str>,
        tags: &[String],
        requester: Option<Uuid>,
    ) -> Result<Vec<DeckBrowserRow>, CatalogError> {
        let mut decks = self.filter(&[], title_substring, tags, requester)?;
        decks.sort_by(filter::browser_order);

        let ids: Vec<String> = decks.iter().map(|d| d.id.clone()).collect();
        let counts = DeckRepository::card_counts(self.conn, &ids)?;

        Ok(decks
            .into_iter()
            .map(|deck| DeckBrowserRow {
                cards: counts.get(&deck.id).copied().unwrap_or_default(),
                tags: deck.tag_names(),
                id: deck.id,
                title: deck.title,
                rating: deck.rating,
                modified: deck.modified,
            })
            .collect())
    }

    pub fn view(&mut self, deck_id: Uuid, requester: Option<Uuid>) -> Result<DeckView, CatalogError> {
        let deck = self.visible_deck(deck_id, requester)?;
        let cards = DeckRepository::card_counts(self.conn, std::slice::from_ref(&deck.id))?;
        let creator_name = DeckRepository::creator_name(self.conn, &deck.creator_id)?
            .unwrap_or_else(|| DELETED_CREATOR.to_string());

        let in_collection = CollectionManager::new(self.conn).is_deck_in_collection(deck_id, requester)?;
        let is_owner = requester.is_some_and(|id| id.to_string() == deck.creator_id);

        Ok(DeckView {
            card_count: cards.get(&deck.id).copied().unwrap_or_default(),
            creator_name,
            is_owner,
            in_collection,
            tags: deck.tag_names(),
            id: deck.id,
            modified: deck.modified,
            rating: deck.rating,
            title: deck.title,
            description: deck.description,
        })
    }

    pub fn editor_view(
        &mut self,
        deck_id: Uuid,
        requester: Option<Uuid>,
    ) -> Result<DeckEditorView, CatalogError> {
        let deck = self.visible_deck(deck_id, requester)?;
        let cards = DeckRepository::find_deck_with_cards(self.conn, &deck.id)?
            .map(|found| found.cards)
            .unwrap_or_default();

        Ok(DeckEditorView {
            card_count: cards.len(),
            cards: cards.into_iter().map(CardDto::from).collect(),
            tags: deck.tag_names(),
            id: deck.id,
            is_public: deck.is_public,
            description: deck.description,
            title: deck.title,
        })
    }

    pub fn deck_title(&mut self, deck_id: Uuid, requester: Option<Uuid>) -> Result<String, CatalogError> {
        Ok(self.visible_deck(deck_id, requester)?.title)
    }

    pub fn user_decks(&mut self, user_id: Uuid) -> Result<Vec<UserDeck>, CatalogError> {
        Ok(DeckRepository::user_decks(self.conn, &user_id.to_string())?)
    }

    /// Creates a deck owned by `requester` and returns its id.
    pub fn create(&mut self, request: &EditedDeckRequest, requester: Uuid) -> Result<Uuid, CatalogError> {
        if requester.is_nil() {
            return Err(CatalogError::InvalidArgument("Invalid user ID.".into()));
        }
        require_title(&request.deck.title)?;

        let deck_id = Uuid::new_v4();
        let deck = Deck {
            id: deck_id.to_string(),
            creator_id: requester.to_string(),
            title: request.deck.title.clone(),
            description: request.deck.description.clone(),
            is_public: request.deck.is_public,
            tags: encode_tags(request.deck.tags.as_deref().unwrap_or_default()),
            rating: 0.0,
            rating_count: 0,
            modified: today(),
        };
        let cards = new_cards(&deck.id, request);

        self.conn.immediate_transaction(|conn| {
            DeckRepository::insert_deck(conn, &deck)?;
            DeckRepository::insert_cards(conn, &cards)?;
            Ok::<_, CatalogError>(())
        })?;

        Ok(deck_id)
    }

    /// Applies an edit from the deck's creator: deck properties, edited
    /// cards, new cards and removed cards. Removed cards take their review
    /// records with them.
    pub fn update(
        &mut self,
        deck_id: Uuid,
        request: &EditedDeckRequest,
        requester: Uuid,
    ) -> Result<(), CatalogError> {
        let deck = self.owned_deck(deck_id, requester)?;
        require_title(&request.deck.title)?;

        let cards = new_cards(&deck.id, request);
        let removed: Vec<String> = request.removed_cards.iter().map(Uuid::to_string).collect();
        let modified = today();

        self.conn.immediate_transaction(|conn| {
            DeckRepository::update_deck(conn, &deck.id, &request.deck, modified)?;

            for card in &request.cards {
                DeckRepository::update_card(conn, &deck.id, card)?;
            }

            DeckRepository::insert_cards(conn, &cards)?;

            let removed = DeckRepository::card_ids_in_deck(conn, &deck.id, &removed)?;
            ReviewRepository::delete_for_cards(conn, &removed)?;
            DeckRepository::delete_cards(conn, &deck.id, &removed)?;

            Ok(())
        })
    }

    /// Deletes the deck, its cards and every user's review records for it.
    pub fn delete(&mut self, deck_id: Uuid, requester: Uuid) -> Result<(), CatalogError> {
        let deck = self.owned_deck(deck_id, requester)?;

        self.conn.immediate_transaction(|conn| {
            ReviewRepository::delete_for_deck(conn, &deck.id)?;
            DeckRepository::delete_deck(conn, &deck.id)?;
            Ok(())
        })
    }

    fn visible_deck(&mut self, deck_id: Uuid, requester: Option<Uuid>) -> Result<Deck, CatalogError> {
        if deck_id.is_nil() {
            return Err(CatalogError::InvalidArgument("Invalid deck ID.".into()));
        }

        self.filter(&[deck_id], None, &[], requester)?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound("Deck not found.".into()))
    }

    fn owned_deck(&mut self, deck_id: Uuid, requester: Uuid) -> Result<Deck, CatalogError> {
        if deck_id.is_nil() {
            return Err(CatalogError::InvalidArgument("Invalid deck ID.".into()));
        }

        let deck = DeckRepository::find_deck(self.conn, &deck_id.to_string())?
            .ok_or_else(|| CatalogError::NotFound("Deck not found.".into()))?;

        if deck.creator_id != requester.to_string() {
            return Err(CatalogError::Forbidden);
        }
        Ok(deck)
    }
}

fn require_title(title: &str) -> Result<(), CatalogError> {
    if title.trim().is_empty() {
        return Err(CatalogError::InvalidArgument(
            "Deck title cannot be empty.".into(),
        ));
    }
    Ok(())
}

fn new_cards(deck_id: &str, request: &EditedDeckRequest) -> Vec<Card> {
    request
        .new_cards
        .iter()
        .map(|card| Card {
            id: Uuid::new_v4().to_string(),
            deck_id: deck_id.to_string(),
            question: card.question.clone(),
            answer: card.answer.clone(),
            description: card.description.clone(),
        })
        .collect()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
