use axum::{extract::State, http::StatusCode, Json};
use tower_sessions::Session;

use crate::data::models::{ApiError, ApiResponse, RegisterForm};
use crate::features::auth::AuthService;
use crate::state::AppState;
use crate::utils::set_user_session;

pub async fn handle_register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    let mut conn = state.pool.get()?;

    let user = AuthService::new(&mut conn, state.bcrypt_cost).register(&form)?;

    set_user_session(&session, &user.id, form.remember_me)
        .await
        .map_err(|e| {
            log::error!("Failed to set session: {:?}", e);
            e
        })?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Registered"))))
}
