//! Test helpers module
//!
//! In-memory fakes for the word store and the translator, a mock Telegram
//! API server and a Postgres test database helper.

#![allow(dead_code)]

pub mod fakes;
pub mod telegram_mock;
pub mod database_helper;

pub use fakes::*;
pub use telegram_mock::*;
pub use database_helper::*;

use std::sync::{Arc, Once};
use std::time::Duration;
use vocab_drill::state::{ConversationMachine, MemoryPendingStore};

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Bot token accepted by the mock Telegram server
pub fn test_bot_token() -> &'static str {
    "12345:test_token"
}

/// A conversation machine wired to in-memory collaborators
pub struct TestMachine {
    pub machine: ConversationMachine,
    pub words: Arc<MemoryWordStore>,
    pub translator: Arc<ScriptedTranslator>,
    pub pending: Arc<MemoryPendingStore>,
}

impl TestMachine {
    pub fn new() -> Self {
        Self::with_translator(ScriptedTranslator::new())
    }

    pub fn with_translator(translator: ScriptedTranslator) -> Self {
        Self::with_pending_ttl(translator, Duration::from_secs(900))
    }

    pub fn with_pending_ttl(translator: ScriptedTranslator, ttl: Duration) -> Self {
        init_test_logging();

        let words = Arc::new(MemoryWordStore::new());
        let translator = Arc::new(translator);
        let pending = Arc::new(MemoryPendingStore::new(ttl));
        let machine = ConversationMachine::new(words.clone(), translator.clone(), pending.clone());

        Self { machine, words, translator, pending }
    }
}
