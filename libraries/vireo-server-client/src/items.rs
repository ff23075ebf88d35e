//! Item and next-up endpoints.

use crate::client::MediaServerClient;
use crate::error::Result;
use tracing::debug;
use vireo_core::types::{EpisodeSummary, ItemId, ItemInfo, MediaSourceInfo};

impl MediaServerClient {
    /// Fetch metadata for one library item.
    pub async fn get_item(&self, item_id: &ItemId) -> Result<ItemInfo> {
        debug!(item = %item_id, "Fetching item info");
        self.get_json(&format!("/api/items/{item_id}"), &[], Some(item_id))
            .await
    }

    /// Fetch the playable media sources of an item.
    pub async fn get_sources(&self, item_id: &ItemId) -> Result<Vec<MediaSourceInfo>> {
        debug!(item = %item_id, "Fetching media sources");
        self.get_json(&format!("/api/items/{item_id}/sources"), &[], Some(item_id))
            .await
    }

    /// Fetch up to `count` episodes following `after` within its
    /// series.
    pub async fn get_next_episodes(
        &self,
        after: &ItemId,
        count: usize,
    ) -> Result<Vec<EpisodeSummary>> {
        debug!(after = %after, count, "Fetching next-up episodes");
        self.get_json(
            "/api/shows/next-up",
            &[
                ("after", after.to_string()),
                ("limit", count.to_string()),
            ],
            Some(after),
        )
        .await
    }

    /// Build the streaming URL for one source of an item.
    ///
    /// Engines fetch media themselves and cannot attach headers, so
    /// the token travels as a query parameter, mirroring how the
    /// server expects stream requests.
    pub fn stream_url(&self, item_id: &ItemId, source_id: &str) -> String {
        let base = format!(
            "{}/api/items/{item_id}/stream?source={source_id}",
            self.url()
        );
        match self.token_for_stream() {
            Some(token) => format!("{base}&token={token}"),
            None => base,
        }
    }
}
