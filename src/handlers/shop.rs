use axum::{extract::State, Json};
use tower_sessions::Session;

use crate::data::models::{ApiError, ApiResponse, UpdateColorRequest};
use crate::features::auth::AuthService;
use crate::state::AppState;
use crate::utils::require_user;

pub async fn update_card_color(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateColorRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    AuthService::new(&mut conn, state.bcrypt_cost).update_card_color(user_id, &payload.new_color)?;
    Ok(Json(ApiResponse::ok("Card color updated")))
}
