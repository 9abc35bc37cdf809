//! In-memory stand-ins for the word store and the translation provider

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use vocab_drill::database::WordStore;
use vocab_drill::models::{Word, WordCounts, WordId};
use vocab_drill::services::Translator;
use vocab_drill::utils::errors::{LookupError, LookupResult, Result, VocabError};

/// Word store keeping every word in a vector
#[derive(Debug, Default)]
pub struct MemoryWordStore {
    words: Mutex<Vec<Word>>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word with preset counters, bypassing the duplicate check
    pub fn seed(&self, owner_id: i64, source: &str, target: &str, attempts: i32, correct: i32) -> WordId {
        let mut words = self.words.lock().unwrap();
        let id = words.len() as WordId + 1;
        words.push(Word {
            id,
            word_source: source.to_string(),
            word_target: target.to_string(),
            owner_id,
            visible: true,
            attempts,
            correct,
            created_at: Utc::now(),
        });
        id
    }

    /// Snapshot of a stored word
    pub fn word(&self, id: WordId) -> Option<Word> {
        self.words.lock().unwrap().iter().find(|w| w.id == id).cloned()
    }

    pub fn words_of(&self, owner_id: i64) -> Vec<Word> {
        self.words
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.owner_id == owner_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl WordStore for MemoryWordStore {
    async fn add_word(&self, owner_id: i64, source: &str, target: &str) -> Result<WordId> {
        let exists = self
            .words
            .lock()
            .unwrap()
            .iter()
            .any(|w| w.owner_id == owner_id && w.word_source == source);
        if exists {
            return Err(VocabError::WordAlreadyExists {
                owner_id,
                source_text: source.to_string(),
            });
        }
        Ok(self.seed(owner_id, source, target, 0, 0))
    }

    async fn get_word(&self, id: WordId) -> Result<Word> {
        self.word(id).ok_or(VocabError::WordNotFound { word_id: id })
    }

    async fn random_visible_word(&self, owner_id: i64) -> Result<Option<Word>> {
        let visible: Vec<Word> = self
            .words_of(owner_id)
            .into_iter()
            .filter(|w| w.visible)
            .collect();
        Ok(visible.choose(&mut rand::thread_rng()).cloned())
    }

    async fn update_counters(&self, id: WordId, visible: bool, attempts: i32, correct: i32) -> Result<()> {
        let mut words = self.words.lock().unwrap();
        let word = words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(VocabError::WordNotFound { word_id: id })?;
        word.visible = visible;
        word.attempts = attempts;
        word.correct = correct;
        Ok(())
    }

    async fn count_words(&self, owner_id: i64) -> Result<WordCounts> {
        let words = self.words_of(owner_id);
        Ok(WordCounts {
            total: words.len() as i64,
            visible: words.iter().filter(|w| w.visible).count() as i64,
        })
    }
}

/// Word store whose every operation fails like an unreachable database
#[derive(Debug, Default)]
pub struct UnavailableWordStore;

#[async_trait]
impl WordStore for UnavailableWordStore {
    async fn add_word(&self, _owner_id: i64, _source: &str, _target: &str) -> Result<WordId> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn get_word(&self, _id: WordId) -> Result<Word> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn random_visible_word(&self, _owner_id: i64) -> Result<Option<Word>> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn update_counters(&self, _id: WordId, _visible: bool, _attempts: i32, _correct: i32) -> Result<()> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn count_words(&self, _owner_id: i64) -> Result<WordCounts> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

/// Translator answering from a fixed dictionary
///
/// Unknown words fail with `EmptyTranslation`; `failing()` makes every
/// lookup time out.
#[derive(Debug, Default)]
pub struct ScriptedTranslator {
    answers: HashMap<String, String>,
    failing: bool,
    calls: AtomicUsize,
}

impl ScriptedTranslator {
    pub fn new() -> Self {
        Self::default()
            .answer("cat", "кот")
            .answer("dog", "собака")
            .answer("hello world", "привет мир")
    }

    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    pub fn answer(mut self, source: &str, target: &str) -> Self {
        self.answers.insert(source.to_string(), target.to_string());
        self
    }

    /// Number of lookups performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    async fn translate(&self, text: &str) -> LookupResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(LookupError::Timeout);
        }
        self.answers
            .get(text)
            .cloned()
            .ok_or(LookupError::EmptyTranslation)
    }
}
