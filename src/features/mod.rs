pub mod auth;
pub mod catalog;
pub mod error_conversions;
pub mod error_responses;
pub mod srs;
pub mod tickets;
