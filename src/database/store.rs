//! Word store contract
//!
//! The conversation state machine only talks to persistence through this
//! trait, so tests can swap the Postgres repository for an in-memory one.

use async_trait::async_trait;
use crate::models::{Word, WordId, WordCounts};
use crate::utils::errors::Result;

#[async_trait]
pub trait WordStore: Send + Sync {
    /// Insert a new word pair
    ///
    /// Fails with `WordAlreadyExists` if the owner already has a word (retired
    /// or not) with the same source text.
    async fn add_word(&self, owner_id: i64, source: &str, target: &str) -> Result<WordId>;

    /// Fetch a word by id, failing with `WordNotFound` if it is absent
    async fn get_word(&self, id: WordId) -> Result<Word>;

    /// Pick one of the owner's visible words uniformly at random
    async fn random_visible_word(&self, owner_id: i64) -> Result<Option<Word>>;

    /// Overwrite the mutable fields of a word
    async fn update_counters(&self, id: WordId, visible: bool, attempts: i32, correct: i32) -> Result<()>;

    /// Count all and visible words of an owner
    async fn count_words(&self, owner_id: i64) -> Result<WordCounts>;
}
