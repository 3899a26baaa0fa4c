use crate::{config::Config, DbPool};

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            pool,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}
