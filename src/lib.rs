//! # Ringot, the Pet Place Telegram bot
//!
//! Chat front-end for the Pet Place pet-care service: handles Telegram
//! commands and free-text forms, forwards structured requests to the
//! backend REST services and relays notification webhooks back to users.

pub mod bot;
pub mod domain;
pub mod form;
pub mod formatter;
pub mod requester;
pub mod sender;
pub mod user_store;
pub mod validator;
