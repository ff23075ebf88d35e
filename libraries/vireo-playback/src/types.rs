//! Core types for the playback session
//!
//! These are the snapshots the session publishes to the presentation
//! layer, plus the item/context shapes commands carry in. All snapshot
//! state lives for one session: created when the first media item is
//! bound, discarded when the session manager is released.

use serde::{Deserialize, Serialize};
use vireo_core::types::{ItemId, ItemInfo};

/// An item the engine can load and play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayableItem {
    /// Library item identifier
    pub id: ItemId,

    /// Resolved streaming URL
    pub url: String,

    /// Display title
    pub title: String,

    /// Secondary display line (series/episode info)
    pub subtitle: Option<String>,

    /// Artwork URL for queue display
    pub artwork_url: Option<String>,

    /// Whether the item is a live stream
    pub is_live: bool,
}

/// Identity context of the currently bound media.
///
/// `preference_key` groups track preferences: episodes share their
/// series id so a track choice made on one episode applies to the whole
/// show; standalone titles use their own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaContext {
    /// Item being played
    pub media_id: ItemId,

    /// Key under which track preferences are stored
    pub preference_key: String,
}

impl MediaContext {
    /// Create a context with an explicit preference key
    pub fn new(media_id: ItemId, preference_key: impl Into<String>) -> Self {
        Self {
            media_id,
            preference_key: preference_key.into(),
        }
    }

    /// Derive the context for a server item (series-scoped key for
    /// episodes, item-scoped otherwise)
    pub fn for_item(item: &ItemInfo) -> Self {
        Self::new(item.id.clone(), item.preference_key())
    }
}

/// Published playback state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStateSnapshot {
    /// Whether playback is advancing
    pub is_playing: bool,

    /// Whether the engine is buffering
    pub is_buffering: bool,

    /// Whether playback ran off the end of the queue
    pub is_ended: bool,

    /// Engine or data error surfaced for retry/dismiss, if any
    pub error: Option<String>,
}

/// Published playback progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackProgress {
    /// Duration of the current item (0 when unknown)
    pub duration_ms: u64,

    /// Current position; not clamped by the engine, consumers clamp to
    /// `duration_ms` for non-live content
    pub position_ms: u64,

    /// Buffered position
    pub buffered_ms: u64,

    /// Whether the current item is a live stream
    pub is_live: bool,
}

/// Published metadata of the currently loaded item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NowPlayingMetadata {
    /// Id of the current item, if one is loaded
    pub media_id: Option<ItemId>,

    /// Display title
    pub title: String,

    /// Secondary display line
    pub subtitle: String,
}

/// One entry of the published queue snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Library item identifier
    pub id: ItemId,

    /// Display title
    pub title: String,

    /// Secondary display line
    pub subtitle: Option<String>,

    /// Artwork URL
    pub artwork_url: Option<String>,

    /// Whether this entry is the engine's current item; at most one
    /// entry has this set
    pub is_current: bool,
}
