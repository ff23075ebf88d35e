//! Vireo - Playback Session Engine
//!
//! Turns a raw playback-engine event stream into application state,
//! auto-applies stored per-title track preferences, reports watch
//! progress with start/heartbeat/stop semantics, computes resume
//! positions and maintains the up-next queue.
//!
//! This crate provides:
//! - `SessionManager`: the single-owner orchestrator and command API
//! - `ProgressReporter`: the Idle/Active reporting state machine
//! - Track mapping (`map_tracks`) from raw engine listings
//! - Track preference matching (`find_best_audio_match`,
//!   `find_best_subtitle_match`)
//! - The `PlayerEngine` trait, the seam to the host's decoder/renderer
//!
//! # Architecture
//!
//! One actor task per session serializes every snapshot mutation.
//! Inputs are the engine's event channel, the command channel behind
//! `SessionManager`, and a heartbeat interval armed only while a
//! reporting binding is active. Network work never blocks the command
//! API: it runs in spawned tasks whose results are posted back onto the
//! actor channel and dropped when stale.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vireo_playback::{MediaContext, PlayableItem, SessionConfig, SessionManager};
//! use vireo_core::types::ItemId;
//!
//! # async fn start(
//! #     engine: Box<dyn vireo_playback::PlayerEngine>,
//! #     server: Arc<dyn vireo_core::MediaServer>,
//! #     preferences: Arc<dyn vireo_core::PreferenceStore>,
//! #     watch_state: Arc<dyn vireo_core::WatchStateStore>,
//! # ) -> vireo_playback::Result<()> {
//! let session = SessionManager::new(
//!     engine,
//!     server,
//!     preferences,
//!     watch_state,
//!     SessionConfig::default(),
//! )?;
//!
//! let item = PlayableItem {
//!     id: ItemId::new("ep-1"),
//!     url: "https://media.example.com/stream/ep-1".to_string(),
//!     title: "Pilot".to_string(),
//!     subtitle: Some("Some Show - S01E01".to_string()),
//!     artwork_url: None,
//!     is_live: false,
//! };
//! let context = MediaContext::new(ItemId::new("ep-1"), "show-1");
//! session.play(item, context);
//!
//! let mut state = session.playback_state();
//! state.changed().await.ok();
//! println!("playing: {}", state.borrow().is_playing);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod error;
pub mod engine;
pub mod events;
pub mod matcher;
mod reporter;
mod session;
pub mod tracks;
pub mod types;

// Public exports
pub use engine::{
    PlayerEngine, RawTrack, SelectionOp, TrackGroup, TrackKind, TrackListing, TrackSelectionUpdate,
};
pub use error::{PlaybackError, Result};
pub use events::EngineEvent;
pub use matcher::{find_best_audio_match, find_best_subtitle_match};
pub use reporter::{ProgressReporter, HEARTBEAT_INTERVAL, WATCHED_THRESHOLD};
pub use session::{SessionConfig, SessionManager};
pub use tracks::{map_tracks, TrackOption, TrackSelectionState, OFF_TEXT_TRACK_ID};
pub use types::{
    MediaContext, NowPlayingMetadata, PlayableItem, PlaybackProgress, PlaybackStateSnapshot,
    QueueItem,
};
