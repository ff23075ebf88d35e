mod ids;
mod item;
mod preferences;

pub use ids::ItemId;
pub use item::{EpisodeSummary, ItemInfo, MediaSourceInfo, UserData, WatchProgress};
pub use preferences::{AudioTrackProperties, SubtitleTrackProperties, TrackPreferences};
