//! Playback engine events
//!
//! Notifications emitted by the playback engine and consumed by the
//! session manager. The engine pushes these over a channel; the session
//! folds them into the published snapshots. Events are deliberately
//! thin: the session reads detailed state back from the engine when it
//! needs more than the event carries.

/// Events emitted by a playback engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The engine started or stopped advancing playback
    PlayingChanged {
        /// Whether playback is currently advancing
        is_playing: bool,
    },

    /// The engine entered or left a buffering stall
    BufferingChanged {
        /// Whether the engine is currently buffering
        is_buffering: bool,
    },

    /// Playback of the last playlist item reached the end
    Ended,

    /// The current playlist item changed (initial load, next/previous,
    /// automatic advance or an explicit jump)
    ItemTransition,

    /// The set of available audio/text/video tracks was (re)established
    TracksChanged,

    /// Periodic position update while loaded
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total duration of the current item (0 when unknown)
        duration_ms: u64,
        /// Buffered position
        buffered_ms: u64,
    },

    /// The playlist contents changed (item added or removed)
    QueueChanged,

    /// The engine reported a playback failure
    Error {
        /// Human-readable failure description
        message: String,
    },
}
