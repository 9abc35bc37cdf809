//! Word repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::database::store::WordStore;
use crate::models::{Word, WordId, WordCounts};
use crate::utils::errors::{VocabError, Result};

const WORD_COLUMNS: &str =
    "id, word_source, word_target, owner_id, visible, attempts, correct, created_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct WordRepository {
    pool: PgPool,
}

impl WordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WordStore for WordRepository {
    /// Create a new word
    ///
    /// The unique `(owner_id, word_source)` constraint makes the duplicate
    /// check and the insert a single statement.
    async fn add_word(&self, owner_id: i64, source: &str, target: &str) -> Result<WordId> {
        let inserted: Option<(WordId,)> = sqlx::query_as(
            r#"
            INSERT INTO words (word_source, word_target, owner_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (owner_id, word_source) DO NOTHING
            RETURNING id
            "#
        )
        .bind(source)
        .bind(target)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some((id,)) => Ok(id),
            None => Err(VocabError::WordAlreadyExists {
                owner_id,
                source_text: source.to_string(),
            }),
        }
    }

    /// Find word by ID
    async fn get_word(&self, id: WordId) -> Result<Word> {
        let word = sqlx::query_as::<_, Word>(
            &format!("SELECT {} FROM words WHERE id = $1", WORD_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        word.ok_or(VocabError::WordNotFound { word_id: id })
    }

    async fn random_visible_word(&self, owner_id: i64) -> Result<Option<Word>> {
        let word = sqlx::query_as::<_, Word>(
            &format!(
                "SELECT {} FROM words WHERE owner_id = $1 AND visible = true ORDER BY RANDOM() LIMIT 1",
                WORD_COLUMNS
            )
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(word)
    }

    async fn update_counters(&self, id: WordId, visible: bool, attempts: i32, correct: i32) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE words
            SET visible = $2,
                attempts = $3,
                correct = $4
            WHERE id = $1
            "#
        )
        .bind(id)
        .bind(visible)
        .bind(attempts)
        .bind(correct)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(VocabError::WordNotFound { word_id: id });
        }

        Ok(())
    }

    /// Count total and learning words
    async fn count_words(&self, owner_id: i64) -> Result<WordCounts> {
        let (total, visible): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE visible) FROM words WHERE owner_id = $1"
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(WordCounts { total, visible })
    }
}
