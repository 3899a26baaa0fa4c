pub mod session;

pub use session::{clear_user_session, get_current_user_id, require_user, set_user_session};
