//! Vireo Core
//!
//! Shared types, traits, and error handling for the Vireo media-server
//! client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `ItemInfo`, `MediaSourceInfo`, `EpisodeSummary`,
//!   track preference shapes, watch progress
//! - **Collaborator Traits**: `MediaServer`, `PreferenceStore`,
//!   `WatchStateStore`
//! - **Tick Conversion**: the server's 100 ns tick unit and the resume
//!   window
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use vireo_core::ticks;
//! use vireo_core::types::ItemId;
//!
//! let id = ItemId::new("ep-1");
//! assert_eq!(ticks::ms_to_ticks(50_000), 500_000_000);
//! assert_eq!(id.as_str(), "ep-1");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod ticks;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::{MediaServer, PreferenceStore, WatchStateStore};
pub use types::{
    AudioTrackProperties, EpisodeSummary, ItemId, ItemInfo, MediaSourceInfo,
    SubtitleTrackProperties, TrackPreferences, UserData, WatchProgress,
};
