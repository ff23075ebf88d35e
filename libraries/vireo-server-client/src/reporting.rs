//! Playback session reporting endpoints.
//!
//! Positions arrive here already converted to the server's tick unit
//! by the session engine; these calls only put them on the wire.

use crate::client::MediaServerClient;
use crate::error::Result;
use crate::types::{PlaybackProgressBody, PlaybackStartBody, PlaybackStoppedBody};
use tracing::debug;
use vireo_core::types::ItemId;

impl MediaServerClient {
    /// Report that playback of an item started.
    pub async fn report_start(&self, item_id: &ItemId, position_ticks: i64) -> Result<()> {
        debug!(item = %item_id, position_ticks, "Reporting playback start");
        self.post_json(
            "/api/sessions/playing",
            &PlaybackStartBody {
                item_id,
                position_ticks,
            },
        )
        .await
    }

    /// Report periodic playback progress.
    pub async fn report_progress(
        &self,
        item_id: &ItemId,
        position_ticks: i64,
        paused: bool,
    ) -> Result<()> {
        self.post_json(
            "/api/sessions/playing/progress",
            &PlaybackProgressBody {
                item_id,
                position_ticks,
                paused,
            },
        )
        .await
    }

    /// Report that playback of an item stopped.
    pub async fn report_stopped(&self, item_id: &ItemId, position_ticks: i64) -> Result<()> {
        debug!(item = %item_id, position_ticks, "Reporting playback stop");
        self.post_json(
            "/api/sessions/playing/stopped",
            &PlaybackStoppedBody {
                item_id,
                position_ticks,
            },
        )
        .await
    }
}
