//! Playback engine seam
//!
//! The session manager drives a host-provided playback engine through
//! this trait. The engine owns decoding and rendering; the session
//! owns everything above it:
//! snapshots, track selection policy, progress reporting and the play
//! queue. Implementations push [`EngineEvent`]s over the channel handed
//! out by [`PlayerEngine::take_event_receiver`].

use crate::events::EngineEvent;
use crate::types::PlayableItem;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Kind of a selectable track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    /// Audio track
    Audio,
    /// Subtitle/caption track
    Text,
    /// Video/quality track
    Video,
}

/// One track as reported by the engine's current listing.
///
/// Raw tracks carry no identity; they are addressed by their position
/// in the listing, which is only valid for the generation it was read
/// from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrack {
    /// Display label embedded in the stream, when present
    pub label: Option<String>,

    /// Language tag, when present
    pub language: Option<String>,

    /// Average bitrate in bits per second, when known
    pub bitrate: Option<u32>,

    /// Channel count (audio tracks)
    pub channel_count: Option<u32>,

    /// Frame height (video tracks)
    pub height: Option<u32>,

    /// Whether the stream flags this as a forced track (subtitles)
    pub forced: bool,

    /// Whether the engine currently has this track selected
    pub selected: bool,
}

/// A group of tracks of one kind in the engine's listing
#[derive(Debug, Clone, PartialEq)]
pub struct TrackGroup {
    /// Kind shared by every track in the group
    pub kind: TrackKind,

    /// Tracks in listing order
    pub tracks: Vec<RawTrack>,
}

/// One consistent snapshot of the engine's track listing.
///
/// Group and track indices are positions within this listing and are
/// invalidated whenever the engine regenerates it (a tracks-changed
/// event marks the boundary).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackListing {
    /// Track groups in listing order
    pub groups: Vec<TrackGroup>,
}

impl TrackListing {
    /// Whether the listing contains no groups at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A single track-selection parameter operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOp {
    /// Enable or disable an entire track kind
    SetKindDisabled {
        /// Kind to toggle
        kind: TrackKind,
        /// True to disable the kind
        disabled: bool,
    },

    /// Remove any explicit override for a kind
    ClearOverrides {
        /// Kind whose overrides are cleared
        kind: TrackKind,
    },

    /// Pin selection of a kind to one track by listing position
    SetOverride {
        /// Kind being overridden
        kind: TrackKind,
        /// Group index within the current listing
        group: usize,
        /// Track index within the group
        track: usize,
    },
}

/// Builder for the engine's track-selection parameters.
///
/// Operations are applied by the engine in the order they were added;
/// the session always clears the prior override of a kind before
/// setting a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSelectionUpdate {
    ops: Vec<SelectionOp>,
}

impl TrackSelectionUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable an entire track kind
    pub fn set_kind_disabled(mut self, kind: TrackKind, disabled: bool) -> Self {
        self.ops.push(SelectionOp::SetKindDisabled { kind, disabled });
        self
    }

    /// Remove any explicit override for a kind
    pub fn clear_overrides(mut self, kind: TrackKind) -> Self {
        self.ops.push(SelectionOp::ClearOverrides { kind });
        self
    }

    /// Pin selection of a kind to one track by listing position
    pub fn set_override(mut self, kind: TrackKind, group: usize, track: usize) -> Self {
        self.ops.push(SelectionOp::SetOverride { kind, group, track });
        self
    }

    /// Operations in application order
    pub fn ops(&self) -> &[SelectionOp] {
        &self.ops
    }
}

/// Host-provided playback engine.
///
/// The session manager is the exclusive owner of the handle for the
/// lifetime of a session; all calls happen from the session's actor
/// task, so implementations do not need interior synchronization for
/// correctness of the session itself.
pub trait PlayerEngine: Send {
    /// Take the engine's event receiver.
    ///
    /// This can only be called once; the session claims the receiver
    /// when it starts.
    fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<EngineEvent>>;

    /// Begin preparation of the current item
    fn prepare(&mut self);

    /// Set whether playback should run once the engine is ready
    fn set_play_when_ready(&mut self, play: bool);

    /// Current play-when-ready flag
    fn play_when_ready(&self) -> bool;

    /// Whether playback is currently advancing
    fn is_playing(&self) -> bool;

    /// Whether the current item is a live stream
    fn is_live(&self) -> bool;

    /// Current playback position in milliseconds
    fn position_ms(&self) -> u64;

    /// Duration of the current item in milliseconds (0 when unknown)
    fn duration_ms(&self) -> u64;

    /// Buffered position in milliseconds
    fn buffered_position_ms(&self) -> u64;

    /// Seek within the current item
    fn seek_to(&mut self, position_ms: u64);

    /// Seek to the live edge of a live stream
    fn seek_to_live_edge(&mut self);

    /// Replace the playlist with a single item
    fn set_item(&mut self, item: PlayableItem);

    /// Append an item to the playlist
    fn add_item(&mut self, item: PlayableItem);

    /// Playlist contents in engine order
    fn items(&self) -> Vec<PlayableItem>;

    /// Index of the current playlist item
    fn current_index(&self) -> usize;

    /// The current playlist item, when one is loaded
    fn current_item(&self) -> Option<PlayableItem>;

    /// Whether a next playlist item exists
    fn has_next(&self) -> bool;

    /// Whether a previous playlist item exists
    fn has_previous(&self) -> bool;

    /// Advance to the next playlist item
    fn seek_next(&mut self);

    /// Return to the previous playlist item
    fn seek_previous(&mut self);

    /// Jump to a playlist item by index
    fn seek_to_index(&mut self, index: usize);

    /// Read the current track listing
    fn current_tracks(&self) -> TrackListing;

    /// Apply track-selection parameters
    fn apply_selection(&mut self, update: TrackSelectionUpdate);

    /// Release engine resources; the handle must not be used afterwards
    fn release(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_preserves_operation_order() {
        let update = TrackSelectionUpdate::new()
            .set_kind_disabled(TrackKind::Text, false)
            .clear_overrides(TrackKind::Text)
            .set_override(TrackKind::Text, 2, 0);

        assert_eq!(
            update.ops(),
            &[
                SelectionOp::SetKindDisabled {
                    kind: TrackKind::Text,
                    disabled: false
                },
                SelectionOp::ClearOverrides {
                    kind: TrackKind::Text
                },
                SelectionOp::SetOverride {
                    kind: TrackKind::Text,
                    group: 2,
                    track: 0
                },
            ]
        );
    }

    #[test]
    fn empty_listing() {
        assert!(TrackListing::default().is_empty());
    }
}
