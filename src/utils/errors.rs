//! Error handling for vocab_drill
//!
//! This module defines the error types used throughout the application.
//! Every variant maps to exactly one user-visible reply (see
//! `state::machine::error_reply`) and to a log severity.

use thiserror::Error;

use crate::models::word::WordId;

/// Main error type for vocab_drill
#[derive(Error, Debug)]
pub enum VocabError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Translation lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Word '{source_text}' already exists for owner {owner_id}")]
    WordAlreadyExists { owner_id: i64, source_text: String },

    #[error("Word not found: {word_id}")]
    WordNotFound { word_id: WordId },

    #[error("Malformed action token: {0:?}")]
    MalformedToken(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Translation provider specific errors
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("translation request failed: {0}")]
    RequestFailed(String),

    #[error("translation request timed out")]
    Timeout,

    #[error("translation provider rate limit exceeded")]
    RateLimited,

    #[error("translation provider returned an error page: {0}")]
    ErrorPage(String),

    #[error("invalid translation response: {0}")]
    InvalidResponse(String),

    #[error("translation provider returned no text")]
    EmptyTranslation,
}

/// Result type alias for vocab_drill operations
pub type Result<T> = std::result::Result<T, VocabError>;

/// Result type alias for translation lookups
pub type LookupResult<T> = std::result::Result<T, LookupError>;

impl VocabError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VocabError::Database(_) => ErrorSeverity::Critical,
            VocabError::Migration(_) => ErrorSeverity::Critical,
            VocabError::Config(_) => ErrorSeverity::Critical,
            VocabError::WordAlreadyExists { .. } => ErrorSeverity::Info,
            VocabError::InvalidInput(_) => ErrorSeverity::Info,
            VocabError::Lookup(_) => ErrorSeverity::Warning,
            VocabError::MalformedToken(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_word_is_not_a_fault() {
        let err = VocabError::WordAlreadyExists {
            owner_id: 1,
            source_text: "cat".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_missing_word_is_a_fault() {
        let err = VocabError::WordNotFound { word_id: 42 };
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.to_string(), "Word not found: 42");
    }

    #[test]
    fn test_lookup_errors_convert() {
        let err: VocabError = LookupError::RateLimited.into();
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(err.to_string().contains("rate limit"));
    }
}
