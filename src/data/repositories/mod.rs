pub mod deck;
pub mod review;
pub mod ticket;
pub mod user;

pub use deck::{DeckQuery, DeckRepository};
pub use review::ReviewRepository;
pub use ticket::TicketRepository;
pub use user::UserRepository;
