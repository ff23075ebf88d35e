//! Main media server client.

use crate::error::{Result, ServerClientError};
use crate::types::{ServerConfig, ServerInfo};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info};
use vireo_core::types::ItemId;

/// Client for the Vireo media server REST API.
///
/// The client carries the server URL and bearer token and provides the
/// item, next-up and playback-reporting operations the session engine
/// consumes. It implements [`vireo_core::MediaServer`], so the session
/// engine only ever sees the trait.
///
/// # Example
///
/// ```ignore
/// use vireo_server_client::{MediaServerClient, ServerConfig};
///
/// let config = ServerConfig::with_token("https://media.example.com", "token");
/// let client = MediaServerClient::new(config)?;
///
/// let info = client.test_connection().await?;
/// println!("Connected to {} v{}", info.name, info.version);
/// ```
#[derive(Debug)]
pub struct MediaServerClient {
    http: Client,
    config: Arc<RwLock<ServerConfig>>,
}

impl MediaServerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let normalized_config = ServerConfig {
            url,
            access_token: config.access_token,
        };

        // Create HTTP client with reasonable defaults
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Vireo/{} (Client)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServerClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the server URL.
    pub fn url(&self) -> String {
        self.config.read().expect("config lock").url.clone()
    }

    /// Check if the client has an access token.
    pub fn is_authenticated(&self) -> bool {
        self.config
            .read()
            .expect("config lock")
            .access_token
            .is_some()
    }

    /// Replace the access token (e.g. after the host refreshed it).
    pub fn set_access_token(&self, access_token: Option<String>) {
        self.config.write().expect("config lock").access_token = access_token;
        info!("access token updated");
    }

    /// Test the connection to the server.
    ///
    /// This does not require authentication.
    pub async fn test_connection(&self) -> Result<ServerInfo> {
        let url = format!("{}/api/info", self.url());

        debug!(url = %url, "Testing server connection");

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ServerClientError::ServerUnreachable(e.to_string())
            } else {
                ServerClientError::Request(e)
            }
        })?;

        let status = response.status();

        if status.is_success() {
            let server_info: ServerInfo = response.json().await.map_err(|e| {
                ServerClientError::ParseError(format!("Failed to parse server info: {}", e))
            })?;

            info!(
                name = %server_info.name,
                version = %server_info.version,
                features = ?server_info.features,
                "Connected to server"
            );

            Ok(server_info)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }

    /// Current token for embedding in stream URLs, if any.
    pub(crate) fn token_for_stream(&self) -> Option<String> {
        self.config
            .read()
            .expect("config lock")
            .access_token
            .clone()
    }

    fn access_token(&self) -> Result<String> {
        self.config
            .read()
            .expect("config lock")
            .access_token
            .clone()
            .ok_or(ServerClientError::AuthRequired)
    }

    /// Authenticated GET returning a JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        item: Option<&ItemId>,
    ) -> Result<T> {
        let url = format!("{}{}", self.url(), path);
        let token = self.access_token()?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ServerClientError::ServerUnreachable(e.to_string())
                } else {
                    ServerClientError::Request(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ServerClientError::ParseError(format!("{path}: {e}")))
        } else {
            Err(self.error_for_status(status, response, item).await)
        }
    }

    /// Authenticated POST of a JSON body; the response body is ignored.
    pub(crate) async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = format!("{}{}", self.url(), path);
        let token = self.access_token()?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ServerClientError::ServerUnreachable(e.to_string())
                } else {
                    ServerClientError::Request(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.error_for_status(status, response, None).await)
        }
    }

    async fn error_for_status(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        item: Option<&ItemId>,
    ) -> ServerClientError {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ServerClientError::AuthRequired
        } else if status == StatusCode::NOT_FOUND {
            match item {
                Some(id) => ServerClientError::NotFound(id.clone()),
                None => ServerClientError::ServerError {
                    status: status.as_u16(),
                    message: "not found".to_string(),
                },
            }
        } else {
            let message = response.text().await.unwrap_or_default();
            ServerClientError::ServerError {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(MediaServerClient::new(ServerConfig::new("https://example.com")).is_ok());
        assert!(MediaServerClient::new(ServerConfig::new("http://localhost:8096")).is_ok());

        // Invalid URLs
        assert!(MediaServerClient::new(ServerConfig::new("")).is_err());
        assert!(MediaServerClient::new(ServerConfig::new("not-a-url")).is_err());
        assert!(MediaServerClient::new(ServerConfig::new("ftp://example.com")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client =
            MediaServerClient::new(ServerConfig::new("https://example.com/")).expect("valid url");

        // URL should have trailing slash removed
        assert_eq!(client.url(), "https://example.com");
    }

    #[test]
    fn test_token_handling() {
        let client =
            MediaServerClient::new(ServerConfig::new("https://example.com")).expect("valid url");
        assert!(!client.is_authenticated());

        client.set_access_token(Some("tok".to_string()));
        assert!(client.is_authenticated());

        client.set_access_token(None);
        assert!(!client.is_authenticated());
    }
}
