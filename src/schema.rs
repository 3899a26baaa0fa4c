// Kept in sync by hand with data/migrations.rs.

diesel::table! {
    users (id) {
        id -> Text,
        username -> Text,
        password -> Text,
        card_color -> Text,
    }
}

diesel::table! {
    decks (id) {
        id -> Text,
        creator_id -> Text,
        title -> Text,
        description -> Nullable<Text>,
        is_public -> Bool,
        tags -> Text,
        rating -> Double,
        rating_count -> BigInt,
        modified -> Date,
    }
}

diesel::table! {
    cards (id) {
        id -> Text,
        deck_id -> Text,
        question -> Text,
        answer -> Text,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    review_records (user_id, deck_id, card_id) {
        user_id -> Text,
        deck_id -> Text,
        card_id -> Text,
        interval -> Integer,
        repetitions -> Integer,
        ease_factor -> Double,
        last_reviewed -> Timestamp,
    }
}

diesel::table! {
    tickets (id) {
        id -> Text,
        user_id -> Text,
        ticket_type -> Text,
        title -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    ticket_comments (id) {
        id -> Text,
        ticket_id -> Text,
        user_id -> Text,
        value -> Text,
        position -> Integer,
        created_at -> Timestamp,
    }
}

diesel::joinable!(cards -> decks (deck_id));
diesel::joinable!(decks -> users (creator_id));
diesel::joinable!(review_records -> cards (card_id));
diesel::joinable!(review_records -> decks (deck_id));
diesel::joinable!(ticket_comments -> tickets (ticket_id));
diesel::joinable!(tickets -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    cards,
    decks,
    review_records,
    ticket_comments,
    tickets,
    users,
);
