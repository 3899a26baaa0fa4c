use axum::{extract::State, Json};
use tower_sessions::Session;

use crate::data::models::{ApiError, ApiResponse, LoginForm, LoginStatus};
use crate::features::auth::AuthService;
use crate::state::AppState;
use crate::utils::{clear_user_session, get_current_user_id, set_user_session};

pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<ApiResponse>, ApiError> {
    let mut conn = state.pool.get()?;

    let user = AuthService::new(&mut conn, state.bcrypt_cost)
        .authenticate(&form.username, &form.password)?;

    set_user_session(&session, &user.id, form.remember_me).await?;

    log::info!("User logged in: {}", user.username);
    Ok(Json(ApiResponse::ok("Logged in")))
}

pub async fn handle_logout(session: Session) -> Result<Json<ApiResponse>, ApiError> {
    clear_user_session(&session).await.map_err(|e| {
        log::error!("Failed to delete session: {}", e);
        e
    })?;

    Ok(Json(ApiResponse::ok("Logged out")))
}

pub async fn login_status(session: Session) -> Json<LoginStatus> {
    Json(LoginStatus {
        logged_in: get_current_user_id(&session).await.is_some(),
    })
}
