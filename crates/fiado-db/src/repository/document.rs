//! # Document Repository
//!
//! Raw access to the `kv_store` table: one JSON text per key.
//!
//! Multi-key writes and deletes run inside a single transaction, so a set of
//! documents always changes together or not at all.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Metadata about one stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub key: String,
    pub updated_at: String,
    pub bytes: i64,
}

/// Repository for key-value documents.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Reads a document. `None` when the key was never written.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Writes every `(key, value)` pair in one transaction.
    ///
    /// All rows get the same `updated_at`.
    pub async fn put_all(&self, entries: &[(&str, String)]) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for (key, value) in entries {
            debug!(key = %key, bytes = value.len(), "Writing document");

            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(*key)
            .bind(value)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Deletes the given keys in one transaction. Returns rows removed.
    pub async fn delete_all(&self, keys: &[&str]) -> DbResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut removed = 0;
        for key in keys {
            removed += sqlx::query("DELETE FROM kv_store WHERE key = ?1")
                .bind(*key)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(removed, "Documents deleted");
        Ok(removed)
    }

    /// Lists stored documents, ordered by key.
    pub async fn list(&self) -> DbResult<Vec<DocumentInfo>> {
        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            "SELECT key, updated_at, LENGTH(CAST(value AS BLOB)) FROM kv_store ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(key, updated_at, bytes)| DocumentInfo {
                key,
                updated_at,
                bytes,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_put_get_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let docs = db.documents();

        assert_eq!(docs.get("a").await.unwrap(), None);

        docs.put_all(&[("a", "[1]".to_string()), ("b", "[2]".to_string())])
            .await
            .unwrap();
        assert_eq!(docs.get("a").await.unwrap().as_deref(), Some("[1]"));

        docs.put_all(&[("a", "[3]".to_string())]).await.unwrap();
        assert_eq!(docs.get("a").await.unwrap().as_deref(), Some("[3]"));

        let listed = docs.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].key, "a");
        assert_eq!(listed[0].bytes, 3);

        assert_eq!(docs.delete_all(&["a", "b", "c"]).await.unwrap(), 2);
        assert!(docs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_all_shares_timestamp() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let docs = db.documents();

        docs.put_all(&[("x", "[]".to_string()), ("y", "[]".to_string())])
            .await
            .unwrap();

        let listed = docs.list().await.unwrap();
        assert_eq!(listed[0].updated_at, listed[1].updated_at);
    }
}
