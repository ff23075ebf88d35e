/// Collaborator traits for the playback session engine
///
/// The session engine talks to three external collaborators: the remote
/// media service, the per-title preference store and the local
/// watch-state store. Each is abstracted behind a trait so the engine
/// can be exercised against mocks and so hosts can swap
/// implementations (HTTP client, SQLite, in-memory).
use crate::error::Result;
use crate::types::{
    AudioTrackProperties, EpisodeSummary, ItemId, ItemInfo, MediaSourceInfo,
    SubtitleTrackProperties, TrackPreferences, WatchProgress,
};
use async_trait::async_trait;

/// Remote media service operations consumed by the session engine.
///
/// All positions cross this boundary in server ticks (100 ns units).
/// Implementations must not panic on server errors; failures are
/// returned and the engine degrades the affected feature silently.
#[async_trait]
pub trait MediaServer: Send + Sync {
    /// Fetch item metadata, including per-user playback state used for
    /// resume computation.
    async fn get_item_info(&self, item_id: &ItemId) -> Result<ItemInfo>;

    /// Fetch the playable sources of an item.
    async fn get_media_sources(&self, item_id: &ItemId) -> Result<Vec<MediaSourceInfo>>;

    /// Build the streaming URL for one source of an item.
    ///
    /// This is a local computation over the client configuration; no
    /// request is made.
    fn playback_url(&self, item_id: &ItemId, source_id: &str) -> String;

    /// Fetch up to `count` episodes following `after` in its series.
    ///
    /// The returned list may include `after` itself or episodes already
    /// queued; callers de-duplicate.
    async fn get_next_episodes(&self, after: &ItemId, count: usize)
        -> Result<Vec<EpisodeSummary>>;

    /// Report that playback of an item started at the given position.
    async fn report_playback_start(&self, item_id: &ItemId, position_ticks: i64) -> Result<()>;

    /// Report periodic playback progress (the heartbeat).
    async fn report_playback_progress(
        &self,
        item_id: &ItemId,
        position_ticks: i64,
        paused: bool,
    ) -> Result<()>;

    /// Report that playback of an item stopped at the given position.
    ///
    /// This is the final report for an item binding.
    async fn report_playback_stopped(&self, item_id: &ItemId, position_ticks: i64) -> Result<()>;
}

/// Persistent per-title track preference store.
///
/// Keyed by preference key: the series id for episodic content, the
/// item id otherwise. Records are overwritten wholesale on save.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Load the preference record for a key. A missing record returns
    /// an empty `TrackPreferences`, not an error.
    async fn get(&self, preference_key: &str) -> Result<TrackPreferences>;

    /// Save (create or overwrite) the audio preference for a key.
    async fn save_audio(
        &self,
        preference_key: &str,
        properties: &AudioTrackProperties,
    ) -> Result<()>;

    /// Save (create or overwrite) the subtitle preference for a key.
    async fn save_subtitle(
        &self,
        preference_key: &str,
        properties: &SubtitleTrackProperties,
    ) -> Result<()>;
}

/// Local watch-state store mirroring final playback progress.
#[async_trait]
pub trait WatchStateStore: Send + Sync {
    /// Load the stored progress for an item, if any.
    async fn get(&self, item_id: &ItemId) -> Result<Option<WatchProgress>>;

    /// Create or replace the stored progress for an item.
    async fn upsert(&self, progress: &WatchProgress) -> Result<()>;
}
