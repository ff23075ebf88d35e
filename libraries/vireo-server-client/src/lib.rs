//! Vireo Media Server Client
//!
//! HTTP client for the Vireo media server REST API: item metadata,
//! media sources, next-up episodes and playback session reporting.
//! Implements [`vireo_core::MediaServer`], so the playback session
//! engine can be handed a `MediaServerClient` directly.
//!
//! Authentication (login, token refresh) is the host application's
//! concern; the client only carries the current bearer token.

#![forbid(unsafe_code)]

mod client;
mod error;
mod items;
mod media_server;
mod reporting;
mod types;

// Public exports
pub use client::MediaServerClient;
pub use error::{Result, ServerClientError};
pub use types::{ServerConfig, ServerInfo};
