pub mod auth;
pub mod deck_browser;
pub mod decks;
pub mod shop;
pub mod tickets;
pub mod user_decks;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    let deck_router = Router::new()
        .route("/", post(decks::create_deck))
        .route("/browse", get(deck_browser::browse_decks))
        .route(
            "/{deck_id}",
            get(decks::view_deck)
                .put(decks::update_deck)
                .delete(decks::delete_deck),
        )
        .route("/{deck_id}/editor", get(decks::editor_view))
        .route("/{deck_id}/title", get(decks::deck_title))
        .route("/{deck_id}/cards", get(decks::due_cards))
        .route("/{deck_id}/collection", post(decks::add_to_collection))
        .route(
            "/{deck_id}/cards/{card_id}/review",
            post(decks::review_card),
        );

    let user_deck_router = Router::new()
        .route("/", get(user_decks::created_decks))
        .route("/collection", get(user_decks::collection_decks))
        .route(
            "/collection/{deck_id}",
            delete(user_decks::remove_from_collection),
        );

    let ticket_router = Router::new()
        .route("/", post(tickets::create_ticket))
        .route("/{id}", get(tickets::get_ticket))
        .route("/{id}/comments", post(tickets::add_comment));

    Router::new()
        .nest("/auth", auth::auth_router())
        .nest("/decks", deck_router)
        .nest("/user-decks", user_deck_router)
        .nest("/tickets", ticket_router)
        .route("/shop/color", post(shop::update_card_color))
        .with_state(state)
}
