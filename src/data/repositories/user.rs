use crate::data::models::{NewUser, User, DEFAULT_CARD_COLOR};
use crate::schema::users;
use diesel::prelude::*;

pub struct UserRepository;

impl UserRepository {
    pub fn find_by_username(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> Result<Option<User>, diesel::result::Error> {
        users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first::<User>(conn)
            .optional()
    }

    pub fn find_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<User>, diesel::result::Error> {
        users::table
            .find(id)
            .select(User::as_select())
            .first::<User>(conn)
            .optional()
    }

    /// `password_hash` must already be hashed.
    pub fn create_user(
        conn: &mut SqliteConnection,
        id: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, diesel::result::Error> {
        diesel::insert_into(users::table)
            .values(&NewUser {
                id,
                username,
                password: password_hash,
                card_color: DEFAULT_CARD_COLOR,
            })
            .execute(conn)?;

        users::table
            .find(id)
            .select(User::as_select())
            .first::<User>(conn)
    }

    pub fn username_exists(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(users::table.filter(users::username.eq(username)))).get_result(conn)
    }

    /// Returns the number of rows changed (0 when the user is unknown).
    pub fn update_card_color(
        conn: &mut SqliteConnection,
        id: &str,
        color: &str,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(users::table.find(id))
            .set(users::card_color.eq(color))
            .execute(conn)
    }
}
