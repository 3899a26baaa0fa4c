pub mod login;
pub mod register;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::handle_register))
        .route("/login", post(login::handle_login))
        .route("/logout", post(login::handle_logout))
        .route("/status", get(login::login_status))
}
