//! Per-title track preference storage
//!
//! Preference records are keyed by preference key and stored as JSON
//! property blobs, one column per track kind, so saving one kind never
//! clobbers the other.

use crate::error::Result;
use crate::Database;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use vireo_core::traits::PreferenceStore;
use vireo_core::types::{AudioTrackProperties, SubtitleTrackProperties, TrackPreferences};

/// Get the preference record for a key
///
/// Returns an empty record if none exists
pub async fn get(pool: &SqlitePool, preference_key: &str) -> Result<TrackPreferences> {
    let row = sqlx::query(
        "SELECT audio_json, subtitle_json FROM track_preferences WHERE preference_key = ?",
    )
    .bind(preference_key)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(TrackPreferences::default());
    };

    let audio_json: Option<String> = row.try_get("audio_json")?;
    let subtitle_json: Option<String> = row.try_get("subtitle_json")?;

    Ok(TrackPreferences {
        audio: audio_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?,
        subtitle: subtitle_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?,
    })
}

/// Create or overwrite the audio preference for a key
pub async fn save_audio(
    pool: &SqlitePool,
    preference_key: &str,
    properties: &AudioTrackProperties,
) -> Result<()> {
    let audio_json = serde_json::to_string(properties)?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO track_preferences (preference_key, audio_json, subtitle_json, updated_at)
         VALUES (?, ?, NULL, ?)
         ON CONFLICT(preference_key)
         DO UPDATE SET
            audio_json = excluded.audio_json,
            updated_at = excluded.updated_at",
    )
    .bind(preference_key)
    .bind(audio_json)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Create or overwrite the subtitle preference for a key
pub async fn save_subtitle(
    pool: &SqlitePool,
    preference_key: &str,
    properties: &SubtitleTrackProperties,
) -> Result<()> {
    let subtitle_json = serde_json::to_string(properties)?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO track_preferences (preference_key, audio_json, subtitle_json, updated_at)
         VALUES (?, NULL, ?, ?)
         ON CONFLICT(preference_key)
         DO UPDATE SET
            subtitle_json = excluded.subtitle_json,
            updated_at = excluded.updated_at",
    )
    .bind(preference_key)
    .bind(subtitle_json)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// [`PreferenceStore`] backed by the local SQLite database
#[derive(Debug, Clone)]
pub struct SqlitePreferenceStore {
    db: Database,
}

impl SqlitePreferenceStore {
    /// Create a store over an open database
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get(&self, preference_key: &str) -> vireo_core::Result<TrackPreferences> {
        get(self.db.pool(), preference_key).await.map_err(Into::into)
    }

    async fn save_audio(
        &self,
        preference_key: &str,
        properties: &AudioTrackProperties,
    ) -> vireo_core::Result<()> {
        save_audio(self.db.pool(), preference_key, properties)
            .await
            .map_err(Into::into)
    }

    async fn save_subtitle(
        &self,
        preference_key: &str,
        properties: &SubtitleTrackProperties,
    ) -> vireo_core::Result<()> {
        save_subtitle(self.db.pool(), preference_key, properties)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spanish_surround() -> AudioTrackProperties {
        AudioTrackProperties {
            language: Some("es".to_string()),
            channel_count: Some(6),
            label: Some("es".to_string()),
        }
    }

    #[tokio::test]
    async fn missing_key_returns_empty_record() {
        let db = Database::in_memory().await.expect("database");
        let record = get(db.pool(), "show-1").await.expect("query ok");
        assert!(record.is_empty());
    }

    #[tokio::test]
    async fn audio_preference_round_trip() {
        let db = Database::in_memory().await.expect("database");

        save_audio(db.pool(), "show-1", &spanish_surround())
            .await
            .expect("save ok");

        let record = get(db.pool(), "show-1").await.expect("query ok");
        assert_eq!(record.audio, Some(spanish_surround()));
        assert!(record.subtitle.is_none());
    }

    #[tokio::test]
    async fn saving_subtitle_preserves_audio() {
        let db = Database::in_memory().await.expect("database");

        save_audio(db.pool(), "show-1", &spanish_surround())
            .await
            .expect("save ok");
        save_subtitle(db.pool(), "show-1", &SubtitleTrackProperties::off())
            .await
            .expect("save ok");

        let record = get(db.pool(), "show-1").await.expect("query ok");
        assert_eq!(record.audio, Some(spanish_surround()));
        assert_eq!(record.subtitle, Some(SubtitleTrackProperties::off()));
    }

    #[tokio::test]
    async fn saves_overwrite_wholesale() {
        let db = Database::in_memory().await.expect("database");

        save_audio(db.pool(), "show-1", &spanish_surround())
            .await
            .expect("save ok");
        let replacement = AudioTrackProperties {
            language: Some("en".to_string()),
            channel_count: None,
            label: None,
        };
        save_audio(db.pool(), "show-1", &replacement)
            .await
            .expect("save ok");

        let record = get(db.pool(), "show-1").await.expect("query ok");
        assert_eq!(record.audio, Some(replacement));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let db = Database::in_memory().await.expect("database");

        save_audio(db.pool(), "show-1", &spanish_surround())
            .await
            .expect("save ok");

        let other = get(db.pool(), "movie-9").await.expect("query ok");
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn store_adapter_round_trip() {
        let db = Database::in_memory().await.expect("database");
        let store = SqlitePreferenceStore::new(db);

        PreferenceStore::save_subtitle(&store, "show-1", &SubtitleTrackProperties::off())
            .await
            .expect("save ok");

        let record = PreferenceStore::get(&store, "show-1").await.expect("get ok");
        assert_eq!(record.subtitle, Some(SubtitleTrackProperties::off()));
    }
}
