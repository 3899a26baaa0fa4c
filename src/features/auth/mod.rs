use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;
use validator::Validate;

use crate::data::models::{AuthError, RegisterForm, User};
use crate::data::repositories::UserRepository;

lazy_static! {
    // #rgb, #rrggbb or a lowercase color name
    static ref CARD_COLOR: Regex =
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$|^[a-z]{3,20}$").unwrap();
}

pub fn is_valid_card_color(color: &str) -> bool {
    CARD_COLOR.is_match(color)
}

fn username_conflict(err: DieselError) -> AuthError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => AuthError::UsernameTaken,
        other => AuthError::DatabaseError(other),
    }
}

/// Account operations on top of [`UserRepository`].
pub struct AuthService<'a> {
    conn: &'a mut SqliteConnection,
    bcrypt_cost: u32,
}

impl<'a> AuthService<'a> {
    pub fn new(conn: &'a mut SqliteConnection, bcrypt_cost: u32) -> Self {
        Self { conn, bcrypt_cost }
    }

    /// Creates the account. Usernames are unique and matched exactly.
    pub fn register(&mut self, form: &RegisterForm) -> Result<User, AuthError> {
        form.validate()?;

        if UserRepository::username_exists(self.conn, &form.username)? {
            log::warn!("Registration attempt with existing username: {}", form.username);
            return Err(AuthError::UsernameTaken);
        }

        let hash = bcrypt::hash(&form.password, self.bcrypt_cost)?;
        let id = Uuid::new_v4().to_string();
        // A concurrent registration can still win the UNIQUE constraint.
        let user = UserRepository::create_user(self.conn, &id, &form.username, &hash)
            .map_err(username_conflict)?;

        log::info!("New user registered: {}", user.username);
        Ok(user)
    }

    /// Unknown usernames and wrong passwords fail the same way.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = UserRepository::find_by_username(self.conn, username)? else {
            log::warn!("User not found: {username}");
            return Err(AuthError::InvalidCredentials);
        };

        if !bcrypt::verify(password, &user.password)? {
            log::warn!("Invalid password for user: {username}");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    pub fn find_user(&mut self, user_id: Uuid) -> Result<User, AuthError> {
        UserRepository::find_by_id(self.conn, &user_id.to_string())?
            .ok_or(AuthError::NotLoggedIn)
    }

    pub fn update_card_color(&mut self, user_id: Uuid, color: &str) -> Result<(), AuthError> {
        if !is_valid_card_color(color) {
            return Err(AuthError::ValidationError(format!("Invalid card color: {color}")));
        }

        match UserRepository::update_card_color(self.conn, &user_id.to_string(), color)? {
            0 => Err(AuthError::NotLoggedIn),
            _ => Ok(()),
        }
    }
}
