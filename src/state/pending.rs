//! Pending translation changes
//!
//! When a user asks to change a suggested translation, the bot has to
//! remember which word the next free-text message belongs to. This is the
//! only conversation state kept between messages. Every store guarantees:
//!
//! - at most one pending word per user, a new `put` replaces the old one
//! - `take` reads and removes the entry atomically, so a pending word is
//!   consumed exactly once even when two updates race
//! - entries expire after the configured TTL

use std::collections::HashMap;
use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::debug;
use crate::config::RedisConfig;
use crate::utils::errors::Result;

/// Word awaiting a user-supplied translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub source: String,
    pub expires_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn new(source: String, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { source, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[async_trait]
pub trait PendingStore: Send + Sync {
    /// Remember `source` as the word awaiting a translation from `user_id`
    async fn put(&self, user_id: i64, source: String) -> Result<()>;

    /// Remove and return the user's pending word, if any and not expired
    async fn take(&self, user_id: i64) -> Result<Option<String>>;

    /// Drop the user's pending word; returns whether a live one existed
    async fn clear(&self, user_id: i64) -> Result<bool> {
        Ok(self.take(user_id).await?.is_some())
    }
}

/// Process-local store guarded by a single mutex
#[derive(Debug)]
pub struct MemoryPendingStore {
    entries: Mutex<HashMap<i64, PendingAction>>,
    ttl: Duration,
}

impl MemoryPendingStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, action| !action.is_expired());
        before - entries.len()
    }
}

#[async_trait]
impl PendingStore for MemoryPendingStore {
    async fn put(&self, user_id: i64, source: String) -> Result<()> {
        let action = PendingAction::new(source, self.ttl);
        self.entries.lock().await.insert(user_id, action);
        Ok(())
    }

    async fn take(&self, user_id: i64) -> Result<Option<String>> {
        let removed = self.entries.lock().await.remove(&user_id);
        match removed {
            Some(action) if action.is_expired() => {
                debug!(user_id = user_id, expires_at = %action.expires_at, "Pending translation expired");
                Ok(None)
            }
            Some(action) => Ok(Some(action.source)),
            None => Ok(None),
        }
    }
}

/// Redis-backed store, shared by every bot instance using the same prefix
#[derive(Clone)]
pub struct RedisPendingStore {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
    ttl: Duration,
}

impl RedisPendingStore {
    pub async fn new(config: RedisConfig, ttl: Duration) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
            ttl,
        })
    }

    fn pending_key(&self, user_id: i64) -> String {
        format!("{}pending:{}", self.config.prefix, user_id)
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl PendingStore for RedisPendingStore {
    async fn put(&self, user_id: i64, source: String) -> Result<()> {
        let key = self.pending_key(user_id);
        let mut conn = self.connection_manager.clone();
        // SETEX rejects a zero TTL
        let ttl_seconds = self.ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&key, source, ttl_seconds).await?;
        debug!(user_id = user_id, key = %key, ttl_seconds = ttl_seconds, "Pending translation saved");
        Ok(())
    }

    async fn take(&self, user_id: i64) -> Result<Option<String>> {
        let key = self.pending_key(user_id);
        let mut conn = self.connection_manager.clone();

        let source: Option<String> = redis::cmd("GETDEL")
            .arg(&key)
            .query_async(&mut conn)
            .await?;
        Ok(source)
    }
}

impl std::fmt::Debug for RedisPendingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPendingStore")
            .field("config", &self.config)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
