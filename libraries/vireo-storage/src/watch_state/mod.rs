//! Local watch-state mirror
//!
//! Final playback progress per item, written by the progress reporter
//! when a session binding ends. Read back for offline display and as a
//! fallback when the server is unreachable.

use crate::error::Result;
use crate::Database;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use vireo_core::traits::WatchStateStore;
use vireo_core::types::{ItemId, WatchProgress};

/// Get the stored progress for an item, if any
pub async fn get(pool: &SqlitePool, item_id: &ItemId) -> Result<Option<WatchProgress>> {
    let row = sqlx::query(
        "SELECT item_id, position_ms, duration_ms, played FROM watch_state WHERE item_id = ?",
    )
    .bind(item_id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| WatchProgress {
        item_id: ItemId::new(row.get::<String, _>("item_id")),
        position_ms: row.get::<i64, _>("position_ms").max(0) as u64,
        duration_ms: row.get::<i64, _>("duration_ms").max(0) as u64,
        played: row.get::<i64, _>("played") != 0,
    }))
}

/// Create or replace the stored progress for an item
pub async fn upsert(pool: &SqlitePool, progress: &WatchProgress) -> Result<()> {
    let played = i64::from(progress.played);
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO watch_state (item_id, position_ms, duration_ms, played, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(item_id)
         DO UPDATE SET
            position_ms = excluded.position_ms,
            duration_ms = excluded.duration_ms,
            played = excluded.played,
            updated_at = excluded.updated_at",
    )
    .bind(progress.item_id.as_str())
    .bind(progress.position_ms as i64)
    .bind(progress.duration_ms as i64)
    .bind(played)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// [`WatchStateStore`] backed by the local SQLite database
#[derive(Debug, Clone)]
pub struct SqliteWatchStateStore {
    db: Database,
}

impl SqliteWatchStateStore {
    /// Create a store over an open database
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WatchStateStore for SqliteWatchStateStore {
    async fn get(&self, item_id: &ItemId) -> vireo_core::Result<Option<WatchProgress>> {
        get(self.db.pool(), item_id).await.map_err(Into::into)
    }

    async fn upsert(&self, progress: &WatchProgress) -> vireo_core::Result<()> {
        upsert(self.db.pool(), progress).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(id: &str, position_ms: u64, played: bool) -> WatchProgress {
        WatchProgress {
            item_id: ItemId::new(id),
            position_ms,
            duration_ms: 600_000,
            played,
        }
    }

    #[tokio::test]
    async fn missing_item_returns_none() {
        let db = Database::in_memory().await.expect("database");
        let row = get(db.pool(), &ItemId::new("e1")).await.expect("query ok");
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn progress_round_trip() {
        let db = Database::in_memory().await.expect("database");

        upsert(db.pool(), &progress("e1", 45_000, false))
            .await
            .expect("upsert ok");

        let row = get(db.pool(), &ItemId::new("e1"))
            .await
            .expect("query ok")
            .expect("row exists");
        assert_eq!(row.position_ms, 45_000);
        assert_eq!(row.duration_ms, 600_000);
        assert!(!row.played);
    }

    #[tokio::test]
    async fn upsert_replaces_prior_progress() {
        let db = Database::in_memory().await.expect("database");

        upsert(db.pool(), &progress("e1", 45_000, false))
            .await
            .expect("upsert ok");
        upsert(db.pool(), &progress("e1", 570_000, true))
            .await
            .expect("upsert ok");

        let row = get(db.pool(), &ItemId::new("e1"))
            .await
            .expect("query ok")
            .expect("row exists");
        assert_eq!(row.position_ms, 570_000);
        assert!(row.played);
    }

    #[tokio::test]
    async fn store_adapter_round_trip() {
        let db = Database::in_memory().await.expect("database");
        let store = SqliteWatchStateStore::new(db);

        WatchStateStore::upsert(&store, &progress("e1", 100_000, false))
            .await
            .expect("upsert ok");

        let row = WatchStateStore::get(&store, &ItemId::new("e1"))
            .await
            .expect("get ok")
            .expect("row exists");
        assert_eq!(row.position_ms, 100_000);
    }
}
