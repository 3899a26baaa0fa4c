use axum::{
    extract::{Path, State},
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::data::models::{ApiError, ApiResponse, UserDeckInformation};
use crate::features::catalog::DeckCatalog;
use crate::features::srs::CollectionManager;
use crate::state::AppState;
use crate::utils::{get_current_user_id, require_user};

fn logged_out() -> Json<UserDeckInformation> {
    Json(UserDeckInformation {
        decks: None,
        is_logged_in: false,
    })
}

/// Decks the requester created.
pub async fn created_decks(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserDeckInformation>, ApiError> {
    let Some(user_id) = get_current_user_id(&session).await else {
        return Ok(logged_out());
    };
    let mut conn = state.pool.get()?;

    let decks = DeckCatalog::new(&mut conn).user_decks(user_id)?;
    Ok(Json(UserDeckInformation {
        decks: Some(decks),
        is_logged_in: true,
    }))
}

/// Decks the requester is studying.
pub async fn collection_decks(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserDeckInformation>, ApiError> {
    let Some(user_id) = get_current_user_id(&session).await else {
        return Ok(logged_out());
    };
    let mut conn = state.pool.get()?;

    let decks = CollectionManager::new(&mut conn).collection_decks(user_id)?;
    Ok(Json(UserDeckInformation {
        decks: Some(decks),
        is_logged_in: true,
    }))
}

pub async fn remove_from_collection(
    State(state): State<AppState>,
    session: Session,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<ApiResponse>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    CollectionManager::new(&mut conn).remove_deck_from_collection(deck_id, user_id)?;
    Ok(Json(ApiResponse::ok("Deck removed from collection")))
}
