//! Vireo Storage
//!
//! SQLite persistence for the Vireo client: per-title track
//! preferences and the local watch-state mirror. Both stores implement
//! the corresponding `vireo-core` traits so the playback session
//! engine never depends on SQLite directly.
//!
//! # Example
//!
//! ```rust,no_run
//! use vireo_storage::{Database, SqlitePreferenceStore, SqliteWatchStateStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("sqlite://vireo.db").await?;
//!
//! let preferences = SqlitePreferenceStore::new(db.clone());
//! let watch_state = SqliteWatchStateStore::new(db);
//! # let _ = (preferences, watch_state);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod database;
mod error;

// Vertical slices
pub mod track_preferences;
pub mod watch_state;

pub use database::Database;
pub use error::{Result, StorageError};
pub use track_preferences::SqlitePreferenceStore;
pub use watch_state::SqliteWatchStateStore;
