//! Word model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Store-assigned word identifier
pub type WordId = i64;

/// A word pair owned by a single Telegram user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Word {
    pub id: WordId,
    pub word_source: String,
    pub word_target: String,
    pub owner_id: i64,
    /// `false` once the word is retired from quizzing
    pub visible: bool,
    pub attempts: i32,
    pub correct: i32,
    pub created_at: DateTime<Utc>,
}

/// Word totals for one owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordCounts {
    pub total: i64,
    pub visible: i64,
}

impl Word {
    /// Record one graded quiz answer
    pub fn record_answer(&mut self, was_correct: bool) {
        self.attempts += 1;
        if was_correct {
            self.correct += 1;
        }
    }

    /// Whether the user should be asked to retire this word
    ///
    /// Fires on every second correct answer once more than three have been
    /// given (4, 6, 8, ...).
    pub fn offers_retirement(&self) -> bool {
        self.correct > 3 && self.correct % 2 == 0
    }

    /// Take the word out of the quiz rotation
    pub fn retire(&mut self) {
        self.visible = false;
    }
}
