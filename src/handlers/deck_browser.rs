use axum::{extract::State, Json};
use axum_extra::extract::Query;
use tower_sessions::Session;

use crate::data::models::{ApiError, BrowseParams, DeckBrowserRow};
use crate::features::catalog::DeckCatalog;
use crate::state::AppState;
use crate::utils::get_current_user_id;

/// `?search=bio&tags=Biology&tags=Beginner`
pub async fn browse_decks(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<BrowseParams>,
) -> Result<Json<Vec<DeckBrowserRow>>, ApiError> {
    let requester = get_current_user_id(&session).await;
    let mut conn = state.pool.get()?;

    let rows = DeckCatalog::new(&mut conn).browse(params.search.as_deref(), &params.tags, requester)?;
    Ok(Json(rows))
}
