use time::Duration;
use tower_sessions::{Expiry, Session};
use uuid::Uuid;

use crate::data::models::AuthError;

const USER_ID_KEY: &str = "user_id";
const REMEMBER_ME_DAYS: i64 = 10;

/// Logs the user in on this session. A fresh session id is issued so an id
/// handed out before login cannot be reused.
pub async fn set_user_session(
    session: &Session,
    user_id: &str,
    remember_me: bool,
) -> Result<(), AuthError> {
    let user_id = Uuid::parse_str(user_id)
        .map_err(|e| AuthError::SessionError(format!("Stored user id is invalid: {e}")))?;

    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;

    if remember_me {
        session.set_expiry(Some(Expiry::OnInactivity(Duration::days(REMEMBER_ME_DAYS))));
    }
    Ok(())
}

pub async fn clear_user_session(session: &Session) -> Result<(), AuthError> {
    session.flush().await?;
    Ok(())
}

pub async fn get_current_user_id(session: &Session) -> Option<Uuid> {
    match session.get::<Uuid>(USER_ID_KEY).await {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Failed to get user_id from session: {}", e);
            None
        }
    }
}

pub async fn require_user(session: &Session) -> Result<Uuid, AuthError> {
    get_current_user_id(session)
        .await
        .ok_or(AuthError::NotLoggedIn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn anonymous_sessions_have_no_user() {
        let session = session();

        assert_eq!(get_current_user_id(&session).await, None);
        assert!(matches!(require_user(&session).await, Err(AuthError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn login_and_logout() {
        let session = session();
        let user_id = Uuid::new_v4();

        set_user_session(&session, &user_id.to_string(), true).await.unwrap();
        assert_eq!(require_user(&session).await.unwrap(), user_id);
        assert!(matches!(
            session.expiry(),
            Some(Expiry::OnInactivity(d)) if d == Duration::days(REMEMBER_ME_DAYS)
        ));

        clear_user_session(&session).await.unwrap();
        assert_eq!(get_current_user_id(&session).await, None);
    }

    #[tokio::test]
    async fn malformed_user_ids_are_refused() {
        let session = session();

        assert!(matches!(
            set_user_session(&session, "not-a-uuid", false).await,
            Err(AuthError::SessionError(_))
        ));
        assert_eq!(get_current_user_id(&session).await, None);
    }
}
