//! Track mapping
//!
//! Converts the engine's raw track listing into the ordered, typed
//! track model the presentation layer renders and the matcher scores.
//! Mapping is a pure transform with no side effects: it is re-run on
//! every tracks-changed event and the previous state is replaced
//! wholesale, because option ids and indices are only valid within the
//! listing generation they were derived from.

use crate::engine::{TrackKind, TrackListing};
use serde::{Deserialize, Serialize};

/// Id of the synthetic "no subtitles" option.
///
/// The option exists if and only if the text track list is non-empty,
/// and is always its first element.
pub const OFF_TEXT_TRACK_ID: &str = "t_off";

/// One selectable track, as shown to the user.
///
/// `group_index`/`track_index` address the track within the listing
/// generation this option was mapped from; the synthetic Off option
/// carries -1 for both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackOption {
    /// Opaque id, valid only within the current listing generation
    pub id: String,

    /// Display label
    pub label: String,

    /// Language tag, when the track reported one
    pub language: Option<String>,

    /// Average bitrate in bits per second, when known
    pub bitrate: Option<u32>,

    /// Channel count (audio tracks)
    pub channel_count: Option<u32>,

    /// Frame height (video tracks)
    pub height: Option<u32>,

    /// Whether the track is flagged as forced (subtitles)
    pub forced: bool,

    /// Group index within the listing this option was mapped from
    pub group_index: i32,

    /// Track index within the group
    pub track_index: i32,

    /// Track kind
    pub kind: TrackKind,

    /// True only for the synthetic "no subtitles" option
    pub is_off: bool,
}

/// Mapped track model for one listing generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSelectionState {
    /// Audio options in listing order
    pub audio_tracks: Vec<TrackOption>,

    /// Text options in listing order, Off sentinel first when non-empty
    pub text_tracks: Vec<TrackOption>,

    /// Video options in listing order
    pub video_tracks: Vec<TrackOption>,

    /// Selected audio option id, if any
    pub selected_audio_track_id: Option<String>,

    /// Selected text option id, if any
    pub selected_text_track_id: Option<String>,

    /// Selected video option id, if any
    pub selected_video_track_id: Option<String>,
}

impl TrackSelectionState {
    /// Look up an option by id across all three kinds
    pub fn find(&self, id: &str) -> Option<&TrackOption> {
        self.audio_tracks
            .iter()
            .chain(self.text_tracks.iter())
            .chain(self.video_tracks.iter())
            .find(|option| option.id == id)
    }
}

/// Map the engine's current listing into a fresh selection state.
///
/// The first engine-selected track of each kind becomes that kind's
/// selected option. When any text track exists a synthetic Off option
/// is prepended, and it becomes the selection when no concrete text
/// track is engine-selected (text defaults to off).
pub fn map_tracks(listing: &TrackListing) -> TrackSelectionState {
    let mut state = TrackSelectionState::default();

    for (group_index, group) in listing.groups.iter().enumerate() {
        for (track_index, track) in group.tracks.iter().enumerate() {
            let option = match group.kind {
                TrackKind::Audio => {
                    let ordinal = state.audio_tracks.len() + 1;
                    let label = track
                        .label
                        .clone()
                        .or_else(|| track.language.clone())
                        .or_else(|| track.channel_count.map(|c| format!("{c}ch")))
                        .unwrap_or_else(|| format!("Audio {ordinal}"));
                    TrackOption {
                        id: format!("a_{group_index}_{track_index}"),
                        label,
                        language: track.language.clone(),
                        bitrate: track.bitrate,
                        channel_count: track.channel_count,
                        height: None,
                        forced: false,
                        group_index: group_index as i32,
                        track_index: track_index as i32,
                        kind: TrackKind::Audio,
                        is_off: false,
                    }
                }
                TrackKind::Text => {
                    let ordinal = state.text_tracks.len() + 1;
                    let label = track
                        .label
                        .clone()
                        .or_else(|| track.language.clone())
                        .unwrap_or_else(|| format!("Subtitle {ordinal}"));
                    TrackOption {
                        id: format!("t_{group_index}_{track_index}"),
                        label,
                        language: track.language.clone(),
                        bitrate: track.bitrate,
                        channel_count: None,
                        height: None,
                        forced: track.forced,
                        group_index: group_index as i32,
                        track_index: track_index as i32,
                        kind: TrackKind::Text,
                        is_off: false,
                    }
                }
                TrackKind::Video => {
                    let ordinal = state.video_tracks.len() + 1;
                    let label = track
                        .height
                        .map(|h| format!("{h}p"))
                        .or_else(|| track.label.clone())
                        .unwrap_or_else(|| format!("Video {ordinal}"));
                    TrackOption {
                        id: format!("v_{group_index}_{track_index}"),
                        label,
                        language: track.language.clone(),
                        bitrate: track.bitrate,
                        channel_count: None,
                        height: track.height,
                        forced: false,
                        group_index: group_index as i32,
                        track_index: track_index as i32,
                        kind: TrackKind::Video,
                        is_off: false,
                    }
                }
            };

            if track.selected {
                let selected = match group.kind {
                    TrackKind::Audio => &mut state.selected_audio_track_id,
                    TrackKind::Text => &mut state.selected_text_track_id,
                    TrackKind::Video => &mut state.selected_video_track_id,
                };
                if selected.is_none() {
                    *selected = Some(option.id.clone());
                }
            }

            match group.kind {
                TrackKind::Audio => state.audio_tracks.push(option),
                TrackKind::Text => state.text_tracks.push(option),
                TrackKind::Video => state.video_tracks.push(option),
            }
        }
    }

    if !state.text_tracks.is_empty() {
        state.text_tracks.insert(0, off_text_option());
        if state.selected_text_track_id.is_none() {
            state.selected_text_track_id = Some(OFF_TEXT_TRACK_ID.to_string());
        }
    }

    state
}

fn off_text_option() -> TrackOption {
    TrackOption {
        id: OFF_TEXT_TRACK_ID.to_string(),
        label: "Off".to_string(),
        language: None,
        bitrate: None,
        channel_count: None,
        height: None,
        forced: false,
        group_index: -1,
        track_index: -1,
        kind: TrackKind::Text,
        is_off: true,
    }
}
