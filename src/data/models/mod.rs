pub mod api_models;
pub mod auth_models;
pub mod deck_models;
pub mod srs_models;
pub mod ticket_models;
pub mod user_models;

pub use api_models::ApiError;
pub use auth_models::{AuthError, LoginForm, LoginStatus, RegisterForm, UpdateColorRequest};
pub use deck_models::{
    encode_tags, ApiResponse, BrowseParams, Card, CardDto, CardProperties, CatalogError,
    CreatedDeck, Deck, DeckBrowserRow, DeckEditorView, DeckProperties, DeckView, DeckWithCards,
    EditedDeckRequest, Tag, UserDeck, UserDeckInformation,
};
pub use srs_models::{CollectionError, DueCardsResponse, ReviewRecord, ReviewRequest};
pub use ticket_models::{
    CommentRequest, TicketCommentDto, TicketCommentRow, TicketDto, TicketError,
    TicketForCreation, TicketRow, TicketType,
};
pub use user_models::{NewUser, User, DEFAULT_CARD_COLOR};
