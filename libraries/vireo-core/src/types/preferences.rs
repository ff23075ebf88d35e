//! Persisted per-title track preferences
//!
//! Preferences are keyed by a preference key (series id for episodes,
//! item id otherwise) and overwritten on every manual track selection.
//! They are read once per tracks-changed event to auto-apply the user's
//! last choice on new listings.

use serde::{Deserialize, Serialize};

/// Stored shape of an audio track preference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTrackProperties {
    /// Track language, when the selected track reported one
    pub language: Option<String>,

    /// Channel count, when the selected track reported one
    pub channel_count: Option<u32>,

    /// Display label of the selected track
    pub label: Option<String>,
}

/// Stored shape of a subtitle track preference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrackProperties {
    /// Track language, when the selected track reported one
    pub language: Option<String>,

    /// Whether the selected track was a forced subtitle track
    pub forced: bool,

    /// Display label of the selected track
    pub label: Option<String>,

    /// True when the user explicitly turned subtitles off
    pub is_off: bool,
}

impl SubtitleTrackProperties {
    /// Preference recording an explicit "subtitles off" choice
    pub fn off() -> Self {
        Self {
            is_off: true,
            ..Self::default()
        }
    }
}

/// The full preference record stored under one preference key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPreferences {
    /// Audio preference, if one was ever saved
    pub audio: Option<AudioTrackProperties>,

    /// Subtitle preference, if one was ever saved
    pub subtitle: Option<SubtitleTrackProperties>,
}

impl TrackPreferences {
    /// Whether neither preference has been recorded
    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.subtitle.is_none()
    }
}
