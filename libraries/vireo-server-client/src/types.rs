//! Wire types for the media server API.
//!
//! Item, media source and episode shapes are shared with `vireo-core`;
//! this module adds the client-side configuration and the handful of
//! bodies that only exist on the wire.

use serde::{Deserialize, Serialize};
use vireo_core::types::ItemId;

/// Connection configuration for a media server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server (e.g. `https://media.example.com`)
    pub url: String,

    /// Bearer token for authenticated requests. Obtaining and
    /// refreshing tokens is the host's concern; the client only
    /// carries the current value.
    pub access_token: Option<String>,
}

impl ServerConfig {
    /// Create a configuration without credentials.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
        }
    }

    /// Create a configuration with an access token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: Some(access_token.into()),
        }
    }
}

/// Server identity returned by the info endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server display name
    pub name: String,

    /// Server version string
    pub version: String,

    /// Feature flags advertised by the server
    #[serde(default)]
    pub features: Vec<String>,
}

/// Body of a playback start report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaybackStartBody<'a> {
    pub item_id: &'a ItemId,
    pub position_ticks: i64,
}

/// Body of a playback heartbeat report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaybackProgressBody<'a> {
    pub item_id: &'a ItemId,
    pub position_ticks: i64,
    pub paused: bool,
}

/// Body of a playback stop report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaybackStoppedBody<'a> {
    pub item_id: &'a ItemId,
    pub position_ticks: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_constructors() {
        let config = ServerConfig::new("https://example.com");
        assert!(config.access_token.is_none());

        let config = ServerConfig::with_token("https://example.com", "tok");
        assert_eq!(config.access_token.as_deref(), Some("tok"));
    }

    #[test]
    fn report_bodies_serialize_camel_case() {
        let id = ItemId::new("e1");
        let body = PlaybackProgressBody {
            item_id: &id,
            position_ticks: 120_000_000,
            paused: true,
        };

        let json = serde_json::to_value(&body).expect("serializable");
        assert_eq!(json["itemId"], "e1");
        assert_eq!(json["positionTicks"], 120_000_000);
        assert_eq!(json["paused"], true);
    }
}
