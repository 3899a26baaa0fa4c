use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::data::models::{ApiError, CommentRequest, TicketCommentDto, TicketDto, TicketForCreation};
use crate::features::tickets::TicketService;
use crate::state::AppState;
use crate::utils::require_user;

pub async fn create_ticket(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<TicketForCreation>,
) -> Result<(StatusCode, Json<TicketDto>), ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    let ticket = TicketService::new(&mut conn).create(&payload, user_id)?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    session: Session,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketDto>, ApiError> {
    require_user(&session).await?;
    let mut conn = state.pool.get()?;

    Ok(Json(TicketService::new(&mut conn).get(ticket_id)?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    session: Session,
    Path(ticket_id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> Result<(StatusCode, Json<TicketCommentDto>), ApiError> {
    let user_id = require_user(&session).await?;
    let mut conn = state.pool.get()?;

    let comment = TicketService::new(&mut conn).add_comment(ticket_id, &payload, user_id)?;
    Ok((StatusCode::CREATED, Json(comment)))
}
