use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::data::models::{
    ApiError, ApiResponse, CardDto, CreatedDeck, DeckEditorView, DeckView, DueCardsResponse,
    EditedDeckRequest, ReviewRecord, ReviewRequest,
};
use crate::features::auth::AuthService;
use crate::features::catalog::DeckCatalog;
use crate::features::srs::CollectionManager;
use crate::state::AppState;
use crate::utils::{get_current_user_id, require_user};

pub async fn view_deck(
    State(state): State<AppState>,
    session: Session,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckView>, ApiError> {
    let requester = get_current_user_id(&session).await;
    let mut conn = state.pool.get()?;

    Ok(Json(DeckCatalog::new(&mut conn).view(deck_id, requester)?))
}

pub async fn editor_view(
    State(state): State<AppState>,
    session: Session,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckEditorView>, ApiError> {
    let requester = get_current_user_id(&session).await;
    let mut conn = state.pool.get()?;

    Ok(Json(DeckCatalog::new(&mut conn).editor_view(deck_id, requester)?))
}

pub async fn deck_title(
    State(state): State<AppState>,
    session: Session,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<String>, ApiError> {
    let requester = get_current_user_id(&session).await;
    let mut conn = state.pool.get()?;

    Ok(Json(DeckCatalog::new(&mut conn).deck_title(deck_id, requester)?))
}

pub async fn create_deck(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<EditedDeckRequest>,
) -> Result<(StatusCode, Json<CreatedDeck>), ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    let id = DeckCatalog::new(&mut conn).create(&payload, user_id)?;

    log::info!("Deck {id} created by {user_id}");
    Ok((StatusCode::CREATED, Json(CreatedDeck { id: id.to_string() })))
}

pub async fn update_deck(
    State(state): State<AppState>,
    session: Session,
    Path(deck_id): Path<Uuid>,
    Json(payload): Json<EditedDeckRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    DeckCatalog::new(&mut conn)
        .update(deck_id, &payload, user_id)
        .inspect_err(|e| log::warn!("Deck {deck_id} update by {user_id} rejected: {e}"))?;

    Ok(Json(ApiResponse::ok("Deck updated")))
}

pub async fn delete_deck(
    State(state): State<AppState>,
    session: Session,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<ApiResponse>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    DeckCatalog::new(&mut conn)
        .delete(deck_id, user_id)
        .inspect_err(|e| log::warn!("Deck {deck_id} delete by {user_id} rejected: {e}"))?;

    log::info!("Deck {deck_id} deleted by {user_id}");
    Ok(Json(ApiResponse::ok("Deck deleted")))
}

/// Due cards with the requester's card color. Nothing due is an empty list.
pub async fn due_cards(
    State(state): State<AppState>,
    session: Session,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DueCardsResponse>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    let cards = CollectionManager::new(&mut conn).get_due_cards(deck_id, user_id)?;
    let user = AuthService::new(&mut conn, state.bcrypt_cost).find_user(user_id)?;

    Ok(Json(DueCardsResponse {
        cards: cards.into_iter().map(CardDto::from).collect(),
        color: user.card_color,
    }))
}

pub async fn add_to_collection(
    State(state): State<AppState>,
    session: Session,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<ApiResponse>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    let added = CollectionManager::new(&mut conn).add_deck_to_collection(user_id, deck_id)?;

    Ok(Json(ApiResponse::ok(format!("{added} cards added to collection"))))
}

pub async fn review_card(
    State(state): State<AppState>,
    session: Session,
    Path((deck_id, card_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewRecord>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    let record =
        CollectionManager::new(&mut conn).update_review(user_id, deck_id, card_id, payload.quality)?;

    Ok(Json(record))
}
