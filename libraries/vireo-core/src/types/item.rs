//! Remote library item metadata
//!
//! These types mirror what the media server reports for a single item:
//! identity, runtime, per-user playback state and the available media
//! sources. Positions and runtimes at the server boundary are expressed
//! in ticks (100 ns units, see [`crate::ticks`]).

use crate::ticks;
use crate::types::ItemId;
use serde::{Deserialize, Serialize};

/// Per-user playback state attached to an item by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// Last reported playback position, in ticks
    #[serde(default)]
    pub playback_position_ticks: i64,

    /// Whether the server considers the item fully watched
    #[serde(default)]
    pub played: bool,
}

/// Item metadata as reported by the remote media server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInfo {
    /// Item identifier
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Series the item belongs to, for episodic content
    #[serde(default)]
    pub series_id: Option<ItemId>,

    /// Series display name, for episodic content
    #[serde(default)]
    pub series_name: Option<String>,

    /// Total runtime in ticks, when known
    #[serde(default)]
    pub run_time_ticks: Option<i64>,

    /// Per-user playback state
    #[serde(default)]
    pub user_data: UserData,
}

impl ItemInfo {
    /// Preference key for this item: the series id for episodes, the
    /// item's own id otherwise. Series-scoped on purpose so a track
    /// choice made on one episode carries to the whole show.
    pub fn preference_key(&self) -> &str {
        self.series_id
            .as_ref()
            .map_or_else(|| self.id.as_str(), ItemId::as_str)
    }

    /// Compute the resume position in milliseconds, if the item is
    /// inside the resume window.
    ///
    /// Runtime prefers the media source's value and falls back to the
    /// item's own; without either there is no resume.
    pub fn resume_position_ms(&self, source: Option<&MediaSourceInfo>) -> Option<u64> {
        let runtime_ticks = source
            .and_then(|s| s.run_time_ticks)
            .or(self.run_time_ticks)?;
        ticks::resume_position_ms(self.user_data.playback_position_ticks, runtime_ticks)
    }
}

/// One playable source of an item (e.g. a file version or stream)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSourceInfo {
    /// Source identifier, scoped to the owning item
    pub id: String,

    /// Display name of the source
    #[serde(default)]
    pub name: Option<String>,

    /// Source runtime in ticks, when known
    #[serde(default)]
    pub run_time_ticks: Option<i64>,
}

/// Summary of an upcoming episode, returned by the next-up endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeSummary {
    /// Episode identifier
    pub id: ItemId,

    /// Episode title
    pub title: String,

    /// Secondary line (typically "Series - S01E02")
    #[serde(default)]
    pub subtitle: Option<String>,

    /// Artwork URL for queue display
    #[serde(default)]
    pub artwork_url: Option<String>,
}

/// Locally persisted watch progress for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchProgress {
    /// Item the progress belongs to
    pub item_id: ItemId,

    /// Last known position in milliseconds
    pub position_ms: u64,

    /// Duration in milliseconds at the time of recording
    pub duration_ms: u64,

    /// Whether the played fraction crossed the watched threshold
    pub played: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with(position_ticks: i64, runtime_ticks: Option<i64>) -> ItemInfo {
        ItemInfo {
            id: ItemId::new("i1"),
            name: "Some Film".to_string(),
            series_id: None,
            series_name: None,
            run_time_ticks: runtime_ticks,
            user_data: UserData {
                playback_position_ticks: position_ticks,
                played: false,
            },
        }
    }

    #[test]
    fn preference_key_prefers_series() {
        let mut item = item_with(0, None);
        assert_eq!(item.preference_key(), "i1");

        item.series_id = Some(ItemId::new("show-9"));
        assert_eq!(item.preference_key(), "show-9");
    }

    #[test]
    fn resume_uses_source_runtime_over_item_runtime() {
        // 5% against the source runtime, but 50% against the item's
        let item = item_with(500_000_000, Some(1_000_000_000));
        let source = MediaSourceInfo {
            id: "src".to_string(),
            name: None,
            run_time_ticks: Some(10_000_000_000),
        };

        assert_eq!(item.resume_position_ms(Some(&source)), Some(50_000));
    }

    #[test]
    fn resume_without_any_runtime_is_none() {
        let item = item_with(500_000_000, None);
        assert_eq!(item.resume_position_ms(None), None);
    }

    #[test]
    fn item_info_deserializes_server_shape() {
        let json = r#"{
            "id": "ep-1",
            "name": "Pilot",
            "seriesId": "show-1",
            "runTimeTicks": 18000000000,
            "userData": { "playbackPositionTicks": 9000000000, "played": false }
        }"#;

        let item: ItemInfo = serde_json::from_str(json).expect("valid item json");
        assert_eq!(item.preference_key(), "show-1");
        assert_eq!(item.user_data.playback_position_ticks, 9_000_000_000);
    }
}
