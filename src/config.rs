use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("Invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Ten years.
const MAX_SESSION_EXPIRY_DAYS: i64 = 3650;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub session_expiry_days: i64,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
    pub cors_origin: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_cost = bcrypt::DEFAULT_COST.to_string();

        let session_expiry_days: i64 = try_load(&lookup, "SESSION_EXPIRY_DAYS", "1")?;
        if !(1..=MAX_SESSION_EXPIRY_DAYS).contains(&session_expiry_days) {
            return Err(ConfigError {
                key: "SESSION_EXPIRY_DAYS",
                value: session_expiry_days.to_string(),
                reason: format!("must be between 1 and {MAX_SESSION_EXPIRY_DAYS}"),
            });
        }

        Ok(Self {
            database_url: try_load(&lookup, "DATABASE_URL", "memento.db")?,
            bind_address: try_load(&lookup, "BIND_ADDRESS", "127.0.0.1:5000")?,
            session_expiry_days,
            cookie_secure: try_load(&lookup, "COOKIE_SECURE", "false")?,
            bcrypt_cost: try_load(&lookup, "BCRYPT_COST", &default_cost)?,
            cors_origin: try_load(&lookup, "CORS_ORIGIN", "http://localhost:5173")?,
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        log::warn!("Invalid {key} value: {e}");
        ConfigError {
            key,
            reason: e.to_string(),
            value,
        }
    })
}
