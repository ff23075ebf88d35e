//! `MediaServer` trait implementation.
//!
//! The session engine consumes the server exclusively through
//! [`vireo_core::MediaServer`]; this adapter maps the client's error
//! type onto the core error at the boundary.

use crate::client::MediaServerClient;
use async_trait::async_trait;
use vireo_core::error::Result;
use vireo_core::traits::MediaServer;
use vireo_core::types::{EpisodeSummary, ItemId, ItemInfo, MediaSourceInfo};

#[async_trait]
impl MediaServer for MediaServerClient {
    async fn get_item_info(&self, item_id: &ItemId) -> Result<ItemInfo> {
        self.get_item(item_id).await.map_err(Into::into)
    }

    async fn get_media_sources(&self, item_id: &ItemId) -> Result<Vec<MediaSourceInfo>> {
        self.get_sources(item_id).await.map_err(Into::into)
    }

    fn playback_url(&self, item_id: &ItemId, source_id: &str) -> String {
        self.stream_url(item_id, source_id)
    }

    async fn get_next_episodes(
        &self,
        after: &ItemId,
        count: usize,
    ) -> Result<Vec<EpisodeSummary>> {
        MediaServerClient::get_next_episodes(self, after, count)
            .await
            .map_err(Into::into)
    }

    async fn report_playback_start(&self, item_id: &ItemId, position_ticks: i64) -> Result<()> {
        self.report_start(item_id, position_ticks)
            .await
            .map_err(Into::into)
    }

    async fn report_playback_progress(
        &self,
        item_id: &ItemId,
        position_ticks: i64,
        paused: bool,
    ) -> Result<()> {
        self.report_progress(item_id, position_ticks, paused)
            .await
            .map_err(Into::into)
    }

    async fn report_playback_stopped(&self, item_id: &ItemId, position_ticks: i64) -> Result<()> {
        self.report_stopped(item_id, position_ticks)
            .await
            .map_err(Into::into)
    }
}
