//! # Key-Value Repository
//!
//! Rows of the `kv_store` table. The cart keeps its whole snapshot under a
//! single key, so a write is always a full overwrite.
//!
//! ## Write Path
//! ```text
//! set("cartLists", "[...]")
//!      │
//!      ▼
//! INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
//! ON CONFLICT(key) DO UPDATE SET value = excluded.value, ...
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for key-value rows.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    /// Creates a new KeyValueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Lists stored keys, for diagnostics.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

#[async_trait]
impl KeyValueStore for KeyValueRepository {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key = %key, found = value.is_some(), "kv get");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "kv set");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> DbResult<()> {
        debug!(key = %key, "kv remove");

        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> (Database, KeyValueRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.key_values();
        (db, repo)
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let (_db, repo) = repo().await;
        assert_eq!(repo.get("cartLists").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_wholesale() {
        let (_db, repo) = repo().await;

        repo.set("cartLists", r#"[{"a":1}]"#).await.unwrap();
        repo.set("cartLists", "[]").await.unwrap();

        assert_eq!(repo.get("cartLists").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(repo.keys().await.unwrap(), vec!["cartLists".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_key() {
        let (_db, repo) = repo().await;

        repo.set("k", "v").await.unwrap();
        repo.remove("k").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_closed_pool_surfaces_unavailable() {
        let (db, repo) = repo().await;
        db.close().await;

        let err = repo.set("k", "v").await.unwrap_err();
        assert!(matches!(err, DbError::Unavailable(_)));
    }
}
