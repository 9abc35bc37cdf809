//! vocab_drill Telegram Bot
//!
//! A Telegram bot for building a personal English vocabulary and drilling it.
//! Users send words, the bot proposes a translation and stores the pair;
//! `/quiz` then asks for translations of random words and keeps per-word
//! counters of how often each was guessed.

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod utils;
pub mod middleware;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{VocabError, Result};

// Re-export main components for easy access
pub use database::{WordRepository, WordStore};
pub use services::{GoogleTranslator, Translator};
pub use state::{ConversationMachine, PendingStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
