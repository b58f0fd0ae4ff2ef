//! Bot module for handling Telegram interactions
//!
//! Split into submodules:
//! - `message_handler`: command dispatch and the form submission pipeline
//! - `callback_handler`: inline keyboard callback queries
//! - `ui_builder`: keyboards, form templates and user-facing copy

pub mod callback_handler;
pub mod message_handler;
pub mod ui_builder;

pub const APP_NAME: &str = "Pet Place";
pub const BOT_NAME: &str = "Ringot";

// Re-export the handler entry points for the dispatcher wiring in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::{edited_message_handler, message_handler};
