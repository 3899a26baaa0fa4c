use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime, Utc};
use diesel::SqliteConnection;
use uuid::Uuid;

use super::scheduler::{self, INITIAL_EASE_FACTOR};
use crate::data::models::{Card, CollectionError, ReviewRecord, UserDeck};
use crate::data::repositories::{DeckRepository, ReviewRepository};

/// How far in the past new records are stamped, so they are due right away.
const NEW_CARD_BACKDATE_DAYS: i64 = 2;

/// Keeps a user's review records in step with the decks they study.
pub struct CollectionManager<'a> {
    conn: &'a mut SqliteConnection,
    /// `None` reads the UTC wall clock.
    clock: Option<fn() -> NaiveDateTime>,
}

impl<'a> CollectionManager<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn, clock: None }
    }

    pub fn with_clock(conn: &'a mut SqliteConnection, clock: fn() -> NaiveDateTime) -> Self {
        Self {
            conn,
            clock: Some(clock),
        }
    }

    fn now(&self) -> NaiveDateTime {
        match self.clock {
            Some(clock) => clock(),
            None => Utc::now().naive_utc(),
        }
    }

    /// Creates a record for every card of the deck the user does not track
    /// yet. Existing records are left alone. Returns how many were created.
    /// The deck must be public or created by the user.
    pub fn add_deck_to_collection(
        &mut self,
        user_id: Uuid,
        deck_id: Uuid,
    ) -> Result<usize, CollectionError> {
        let user_id = require_id(user_id, "user")?;
        let deck_id = require_id(deck_id, "deck")?;
        let now = self.now();

        self.conn.immediate_transaction(|conn| {
            // Private decks of other users look missing.
            let deck = DeckRepository::find_deck_with_cards(conn, &deck_id)?
                .filter(|found| found.deck.is_public || found.deck.creator_id == user_id)
                .ok_or_else(|| CollectionError::NotFound("Deck not found.".into()))?;

            if deck.cards.is_empty() {
                return Err(CollectionError::InvalidArgument(
                    "Deck has no cards.".into(),
                ));
            }

            let tracked: HashSet<String> =
                ReviewRepository::find_review_records(conn, &user_id, &deck_id)?
                    .into_iter()
                    .map(|record| record.card_id)
                    .collect();

            let last_reviewed = now - Duration::days(NEW_CARD_BACKDATE_DAYS);
            let new_records: Vec<ReviewRecord> = deck
                .cards
                .into_iter()
                .filter(|card| !tracked.contains(&card.id))
                .map(|card| ReviewRecord {
                    user_id: user_id.clone(),
                    deck_id: deck_id.clone(),
                    card_id: card.id,
                    interval: 1,
                    repetitions: 0,
                    ease_factor: INITIAL_EASE_FACTOR,
                    last_reviewed,
                })
                .collect();

            if new_records.is_empty() {
                return Ok(0);
            }

            ReviewRepository::save_review_records(conn, &new_records)?;
            Ok(new_records.len())
        })
    }

    /// Drops every record the user holds for the deck. Removing a deck that
    /// is not in the collection is a no-op.
    pub fn remove_deck_from_collection(
        &mut self,
        deck_id: Uuid,
        user_id: Uuid,
    ) -> Result<usize, CollectionError> {
        let deck_id = require_id(deck_id, "deck")?;
        let user_id = require_id(user_id, "user")?;

        Ok(ReviewRepository::delete_review_records(
            self.conn, &user_id, &deck_id,
        )?)
    }

    /// Cards of the deck that are due today, ordered by card id.
    pub fn get_due_cards(
        &mut self,
        deck_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Card>, CollectionError> {
        let deck_id = require_id(deck_id, "deck")?;
        let user_id = require_id(user_id, "user")?;
        let now = self.now();

        let due_ids: Vec<String> = ReviewRepository::find_review_records(self.conn, &user_id, &deck_id)?
            .into_iter()
            .filter(|record| scheduler::is_due(record, now))
            .map(|record| record.card_id)
            .collect();

        Ok(DeckRepository::find_cards_by_ids(self.conn, &due_ids)?)
    }

    /// Grades one card and stores the new schedule.
    ///
    /// Read, grade and write share one write-locking transaction so two
    /// concurrent grades of the same card cannot overwrite each other.
    pub fn update_review(
        &mut self,
        user_id: Uuid,
        deck_id: Uuid,
        card_id: Uuid,
        quality: i32,
    ) -> Result<ReviewRecord, CollectionError> {
        let user_id = require_id(user_id, "user")?;
        let deck_id = require_id(deck_id, "deck")?;
        let card_id = require_id(card_id, "card")?;
        let clock = self.clock;

        self.conn.immediate_transaction(|conn| {
            let record = ReviewRepository::find_review_record(conn, &user_id, &deck_id, &card_id)?
                .ok_or_else(|| {
                    CollectionError::NotFound(
                        "Card data not found for the specified user, deck, and card.".into(),
                    )
                })?;

            let graded = match clock {
                Some(clock) => scheduler::grade_at(record, quality, clock()),
                None => scheduler::grade(record, quality),
            };
            ReviewRepository::update_review_record(conn, &graded)?;
            Ok(graded)
        })
    }

    pub fn collection_decks(&mut self, user_id: Uuid) -> Result<Vec<UserDeck>, CollectionError> {
        let user_id = require_id(user_id, "user")?;
        Ok(ReviewRepository::collection_decks(self.conn, &user_id)?)
    }

    /// Anonymous requesters have no collection.
    pub fn is_deck_in_collection(
        &mut self,
        deck_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<bool, CollectionError> {
        let Some(user_id) = user_id else {
            return Ok(false);
        };
        let deck_id = require_id(deck_id, "deck")?;
        let user_id = require_id(user_id, "user")?;

        Ok(ReviewRepository::has_records(self.conn, &user_id, &deck_id)?)
    }
}

fn require_id(id: Uuid, what: &str) -> Result<String, CollectionError> {
    if id.is_nil() {
        return Err(CollectionError::InvalidArgument(format!("Invalid {what} ID.")));
    }
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{self, TestDb};

    fn fixed_now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-03-10 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn next_week() -> NaiveDateTime {
        fixed_now() + Duration::days(7)
    }

    fn uuid(id: &str) -> Uuid {
        Uuid::parse_str(id).unwrap()
    }

    #[test]
    fn adding_a_deck_bootstraps_every_card() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, cards) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 2);
        let user = test_support::seed_user(&mut conn, "student");

        let added = CollectionManager::with_clock(&mut conn, fixed_now)
            .add_deck_to_collection(uuid(&user), uuid(&deck))
            .unwrap();
        assert_eq!(added, 2);

        let records = ReviewRepository::find_review_records(&mut conn, &user, &deck).unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(cards.contains(&record.card_id));
            assert_eq!(record.interval, 1);
            assert_eq!(record.repetitions, 0);
            assert_eq!(record.ease_factor, 2.5);
            assert_eq!(record.last_reviewed, fixed_now() - Duration::days(2));
        }
    }

    #[test]
    fn adding_twice_keeps_existing_state() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, cards) = test_support::seed_deck_with_cards(&mut conn, &owner, "Verbs", 2);
        let user = test_support::seed_user(&mut conn, "student");

        let mut manager = CollectionManager::with_clock(&mut conn, fixed_now);
        manager.add_deck_to_collection(uuid(&user), uuid(&deck)).unwrap();
        manager
            .update_review(uuid(&user), uuid(&deck), uuid(&cards[0]), 5)
            .unwrap();
        let before = ReviewRepository::find_review_records(&mut conn, &user, &deck).unwrap();

        let added = CollectionManager::with_clock(&mut conn, fixed_now)
            .add_deck_to_collection(uuid(&user), uuid(&deck))
            .unwrap();
        assert_eq!(added, 0);

        let after = ReviewRepository::find_review_records(&mut conn, &user, &deck).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn adding_again_picks_up_new_cards() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, _) = test_support::seed_deck_with_cards(&mut conn, &owner, "Verbs", 1);
        let user = test_support::seed_user(&mut conn, "student");

        CollectionManager::with_clock(&mut conn, fixed_now)
            .add_deck_to_collection(uuid(&user), uuid(&deck))
            .unwrap();
        let extra = test_support::seed_card(&mut conn, &deck, "to run");

        let added = CollectionManager::with_clock(&mut conn, fixed_now)
            .add_deck_to_collection(uuid(&user), uuid(&deck))
            .unwrap();
        assert_eq!(added, 1);
        assert!(
            ReviewRepository::find_review_record(&mut conn, &user, &deck, &extra)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn adding_unknown_or_empty_decks_fails() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let empty = test_support::seed_deck(&mut conn, &owner, "Empty", true, &[]);

        let mut manager = CollectionManager::new(&mut conn);
        let missing = manager.add_deck_to_collection(uuid(&owner), Uuid::new_v4());
        assert!(matches!(missing, Err(CollectionError::NotFound(_))));

        let empty = manager.add_deck_to_collection(uuid(&owner), uuid(&empty));
        assert!(matches!(empty, Err(CollectionError::InvalidArgument(_))));

        let nil = manager.add_deck_to_collection(Uuid::nil(), Uuid::new_v4());
        assert!(matches!(nil, Err(CollectionError::InvalidArgument(_))));
    }

    #[test]
    fn private_decks_only_join_their_creators_collection() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let deck = test_support::seed_deck(&mut conn, &owner, "Diary", false, &[]);
        test_support::seed_card(&mut conn, &deck, "secret question");
        let intruder = test_support::seed_user(&mut conn, "intruder");

        let mut manager = CollectionManager::with_clock(&mut conn, fixed_now);
        let denied = manager.add_deck_to_collection(uuid(&intruder), uuid(&deck));
        assert!(matches!(denied, Err(CollectionError::NotFound(_))));
        assert!(manager.get_due_cards(uuid(&deck), uuid(&intruder)).unwrap().is_empty());

        assert_eq!(
            manager.add_deck_to_collection(uuid(&owner), uuid(&deck)).unwrap(),
            1
        );
    }

    #[test]
    fn new_cards_are_due_immediately() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, cards) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 3);
        let user = test_support::seed_user(&mut conn, "student");

        let mut manager = CollectionManager::with_clock(&mut conn, fixed_now);
        manager.add_deck_to_collection(uuid(&user), uuid(&deck)).unwrap();

        let due = manager.get_due_cards(uuid(&deck), uuid(&user)).unwrap();
        let due_ids: Vec<String> = due.into_iter().map(|c| c.id).collect();

        let mut expected = cards.clone();
        expected.sort();
        assert_eq!(due_ids, expected);
    }

    #[test]
    fn graded_cards_leave_the_due_list_until_their_date() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, cards) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 2);
        let user = test_support::seed_user(&mut conn, "student");

        let mut manager = CollectionManager::with_clock(&mut conn, fixed_now);
        manager.add_deck_to_collection(uuid(&user), uuid(&deck)).unwrap();
        manager
            .update_review(uuid(&user), uuid(&deck), uuid(&cards[0]), 4)
            .unwrap();

        let due = manager.get_due_cards(uuid(&deck), uuid(&user)).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, cards[1]);

        let due = CollectionManager::with_clock(&mut conn, next_week)
            .get_due_cards(uuid(&deck), uuid(&user))
            .unwrap();
        assert_eq!(due.len(), 2);
    }

    #[test]
    fn due_cards_are_empty_without_a_collection() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, _) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 2);
        let user = test_support::seed_user(&mut conn, "student");

        let due = CollectionManager::new(&mut conn)
            .get_due_cards(uuid(&deck), uuid(&user))
            .unwrap();
        assert!(due.is_empty());
    }

    #[test]
    fn removing_a_deck_clears_due_cards() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, _) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 2);
        let user = test_support::seed_user(&mut conn, "student");

        let mut manager = CollectionManager::with_clock(&mut conn, fixed_now);
        manager.add_deck_to_collection(uuid(&user), uuid(&deck)).unwrap();

        assert_eq!(
            manager
                .remove_deck_from_collection(uuid(&deck), uuid(&user))
                .unwrap(),
            2
        );
        assert!(manager.get_due_cards(uuid(&deck), uuid(&user)).unwrap().is_empty());

        // Second removal is a silent no-op.
        assert_eq!(
            manager
                .remove_deck_from_collection(uuid(&deck), uuid(&user))
                .unwrap(),
            0
        );
    }

    #[test]
    fn removal_only_touches_the_requesting_user() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, _) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 2);
        let alice = test_support::seed_user(&mut conn, "alice");
        let bob = test_support::seed_user(&mut conn, "bob");

        let mut manager = CollectionManager::with_clock(&mut conn, fixed_now);
        manager.add_deck_to_collection(uuid(&alice), uuid(&deck)).unwrap();
        manager.add_deck_to_collection(uuid(&bob), uuid(&deck)).unwrap();
        manager
            .remove_deck_from_collection(uuid(&deck), uuid(&alice))
            .unwrap();

        assert!(manager.get_due_cards(uuid(&deck), uuid(&alice)).unwrap().is_empty());
        assert_eq!(manager.get_due_cards(uuid(&deck), uuid(&bob)).unwrap().len(), 2);
    }

    #[test]
    fn update_review_grades_and_persists() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, cards) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 1);
        let user = test_support::seed_user(&mut conn, "student");

        let mut manager = CollectionManager::with_clock(&mut conn, fixed_now);
        manager.add_deck_to_collection(uuid(&user), uuid(&deck)).unwrap();

        let graded = manager
            .update_review(uuid(&user), uuid(&deck), uuid(&cards[0]), 5)
            .unwrap();
        assert_eq!(graded.interval, 1);
        assert_eq!(graded.repetitions, 1);
        assert!((graded.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(graded.last_reviewed, fixed_now());

        let stored = ReviewRepository::find_review_record(&mut conn, &user, &deck, &cards[0])
            .unwrap()
            .unwrap();
        assert_eq!(stored, graded);
    }

    #[test]
    fn update_review_stamps_the_wall_clock_by_default() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, cards) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 1);
        let user = test_support::seed_user(&mut conn, "student");

        let mut manager = CollectionManager::new(&mut conn);
        manager.add_deck_to_collection(uuid(&user), uuid(&deck)).unwrap();

        let before = Utc::now().naive_utc();
        let graded = manager
            .update_review(uuid(&user), uuid(&deck), uuid(&cards[0]), 3)
            .unwrap();
        let after = Utc::now().naive_utc();

        assert!(graded.last_reviewed >= before && graded.last_reviewed <= after);
        assert!(manager.get_due_cards(uuid(&deck), uuid(&user)).unwrap().is_empty());
    }

    #[test]
    fn update_review_compounds_and_resets() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, cards) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 1);
        let user = test_support::seed_user(&mut conn, "student");

        let mut manager = CollectionManager::with_clock(&mut conn, fixed_now);
        manager.add_deck_to_collection(uuid(&user), uuid(&deck)).unwrap();
        let card = uuid(&cards[0]);

        manager.update_review(uuid(&user), uuid(&deck), card, 4).unwrap();
        manager.update_review(uuid(&user), uuid(&deck), card, 4).unwrap();
        let third = manager.update_review(uuid(&user), uuid(&deck), card, 4).unwrap();
        assert_eq!(third.interval, 15);
        assert_eq!(third.repetitions, 3);

        let failed = manager.update_review(uuid(&user), uuid(&deck), card, 1).unwrap();
        assert_eq!(failed.interval, 1);
        assert_eq!(failed.repetitions, 0);
        assert!((failed.ease_factor - third.ease_factor).abs() < 1e-12);
    }

    #[test]
    fn update_review_without_record_is_not_found() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (deck, cards) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 1);
        let user = test_support::seed_user(&mut conn, "student");

        let result = CollectionManager::new(&mut conn).update_review(
            uuid(&user),
            uuid(&deck),
            uuid(&cards[0]),
            5,
        );

        assert!(matches!(result, Err(CollectionError::NotFound(_))));
        assert!(
            ReviewRepository::find_review_records(&mut conn, &user, &deck)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn collection_lists_decks_once() {
        let TestDb { mut conn, owner, .. } = test_support::database();
        let (verbs, _) = test_support::seed_deck_with_cards(&mut conn, &owner, "Verbs", 3);
        let (capitals, _) = test_support::seed_deck_with_cards(&mut conn, &owner, "Capitals", 2);
        let user = test_support::seed_user(&mut conn, "student");

        let mut manager = CollectionManager::with_clock(&mut conn, fixed_now);
        manager.add_deck_to_collection(uuid(&user), uuid(&verbs)).unwrap();
        manager.add_deck_to_collection(uuid(&user), uuid(&capitals)).unwrap();

        let decks = manager.collection_decks(uuid(&user)).unwrap();
        let titles: Vec<&str> = decks.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["Capitals", "Verbs"]);

        assert!(manager.is_deck_in_collection(uuid(&verbs), Some(uuid(&user))).unwrap());
        assert!(!manager.is_deck_in_collection(uuid(&verbs), Some(uuid(&owner))).unwrap());
        assert!(!manager.is_deck_in_collection(uuid(&verbs), None).unwrap());
    }
}
