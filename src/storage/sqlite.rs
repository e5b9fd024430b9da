use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::info;

use crate::config::DatabaseSettings;
use crate::models::{BadgeGroups, Result, ScoreError, ScoreRecord, WalletScore};
use crate::storage::ScoreStore;

const CREATE_SCORE_RECORDS: &str = r#"
    CREATE TABLE IF NOT EXISTS score_records (
        user_key TEXT PRIMARY KEY NOT NULL,
        username TEXT,
        email TEXT,
        title TEXT NOT NULL,
        badges TEXT NOT NULL,
        badge_groups TEXT NOT NULL,
        social_score REAL NOT NULL,
        vault_score REAL NOT NULL,
        wallets TEXT NOT NULL,
        aggregate_score REAL NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

/// `ScoreStore` backed by a SQLite database.
pub struct SqliteScoreStore {
    pool: SqlitePool,
}

impl SqliteScoreStore {
    /// Opens (creating if needed) the database at `settings.url` and makes
    /// sure the schema exists.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections.max(1))
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!("Score store ready at {}", settings.url);
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_SCORE_RECORDS).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM score_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }

    fn record_from_row(row: &SqliteRow) -> Result<ScoreRecord> {
        let badges: String = row.try_get("badges")?;
        let badge_groups: String = row.try_get("badge_groups")?;
        let wallets: String = row.try_get("wallets")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(ScoreRecord {
            user_key: row.try_get("user_key")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            title: row.try_get("title")?,
            badges: serde_json::from_str::<Vec<String>>(&badges)?,
            badge_groups: serde_json::from_str::<BadgeGroups>(&badge_groups)?,
            social_score: row.try_get("social_score")?,
            vault_score: row.try_get("vault_score")?,
            wallets: serde_json::from_str::<Vec<WalletScore>>(&wallets)?,
            aggregate_score: row.try_get("aggregate_score")?,
            created_at: parse_stored_time(&created_at)?,
            updated_at: parse_stored_time(&updated_at)?,
        })
    }
}

fn parse_stored_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ScoreError::InvalidInput(format!("Bad stored timestamp '{}': {}", raw, e)))
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn load(&self, user_key: &str) -> Result<Option<ScoreRecord>> {
        let row = sqlx::query(
            r#"
            SELECT user_key, username, email, title, badges, badge_groups, social_score, vault_score,
                   wallets, aggregate_score, created_at, updated_at
            FROM score_records
            WHERE user_key = ?1
            "#,
        )
        .bind(user_key)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn save(&self, record: &ScoreRecord) -> Result<()> {
        let badges = serde_json::to_string(&record.badges)?;
        let badge_groups = serde_json::to_string(&record.badge_groups)?;
        let wallets = serde_json::to_string(&record.wallets)?;

        sqlx::query(
            r#"
            INSERT INTO score_records (
                user_key, username, email, title, badges, badge_groups, social_score,
                vault_score, wallets, aggregate_score, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT (user_key) DO UPDATE SET
                username = EXCLUDED.username,
                email = EXCLUDED.email,
                title = EXCLUDED.title,
                badges = EXCLUDED.badges,
                badge_groups = EXCLUDED.badge_groups,
                social_score = EXCLUDED.social_score,
                vault_score = EXCLUDED.vault_score,
                wallets = EXCLUDED.wallets,
                aggregate_score = EXCLUDED.aggregate_score,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&record.user_key)
        .bind(&record.username)
        .bind(&record.email)
        .bind(&record.title)
        .bind(&badges)
        .bind(&badge_groups)
        .bind(record.social_score)
        .bind(record.vault_score)
        .bind(&wallets)
        .bind(record.aggregate_score)
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
