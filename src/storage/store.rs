use async_trait::async_trait;

use crate::models::{Result, ScoreRecord};

/// Durable home for per-user score records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn load(&self, user_key: &str) -> Result<Option<ScoreRecord>>;

    /// Inserts or replaces the record keyed by `record.user_key`.
    async fn save(&self, record: &ScoreRecord) -> Result<()>;
}
