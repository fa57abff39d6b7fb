// ABOUTME: HTTP client for the Figma REST API
// ABOUTME: Timeouts, response-size guard, alternate node-id retry and rendered-image lookups

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use figstory_config::defaults;

use crate::error::{FigmaError, FigmaResult};
use crate::node::{DesignNode, FileResponse, ImagesResponse, NodesResponse};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Settings for talking to Figma, injected into every client
#[derive(Debug, Clone)]
pub struct FigmaConfig {
    pub access_token: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
    pub max_response_bytes: u64,
    pub max_frames: usize,
    pub image_batch_size: usize,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_url: defaults::FIGMA_API_URL.to_string(),
            timeout: Duration::from_secs(defaults::FIGMA_TIMEOUT_SECS),
            max_response_bytes: defaults::FIGMA_MAX_RESPONSE_MB * BYTES_PER_MB,
            max_frames: defaults::FIGMA_MAX_FRAMES,
            image_batch_size: defaults::FIGMA_IMAGE_BATCH_SIZE,
        }
    }
}

/// Operations the importer needs from the design-file service
#[async_trait]
pub trait FigmaApi: Send + Sync {
    /// Whole document tree of a file
    async fn fetch_file(&self, file_id: &str) -> FigmaResult<FileResponse>;

    /// Shallow document tree, used when the full file is too large
    async fn fetch_file_metadata_only(&self, file_id: &str) -> FigmaResult<FileResponse>;

    /// One node, retrying once with the alternate id encoding
    async fn fetch_node(&self, file_id: &str, node_id: &str) -> FigmaResult<DesignNode>;

    /// Rendered PNG URLs for a bounded list of node ids; callers batch
    async fn fetch_images(
        &self,
        file_id: &str,
        node_ids: &[String],
    ) -> FigmaResult<HashMap<String, String>>;

    /// Byte size of a rendered image, from its Content-Length
    async fn fetch_image_size(&self, image_url: &str) -> FigmaResult<Option<u64>>;
}

/// Figma REST client
#[derive(Clone)]
pub struct FigmaClient {
    http: Client,
    base_url: String,
    token: String,
    max_response_bytes: u64,
}

impl FigmaClient {
    /// Create a client; fails with `Unconfigured` when no access token is set
    pub fn new(config: &FigmaConfig) -> FigmaResult<Self> {
        let token = config
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(FigmaError::Unconfigured)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FigmaError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token,
            max_response_bytes: config.max_response_bytes,
        })
    }

    async fn send(&self, path: &str, query: &[(&str, String)]) -> FigmaResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Requesting Figma endpoint: {}", path);

        let response = self
            .http
            .get(&url)
            .header("X-Figma-Token", &self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Figma API error: {} - {}", status, message);
            return Err(FigmaError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> FigmaResult<T> {
        let response = self.send(path, query).await?;

        // Refuse before buffering anything when the declared size is over the ceiling
        if let Some(declared) = response.content_length() {
            if declared > self.max_response_bytes {
                warn!(
                    "Figma response for {} declares {} bytes, limit is {}",
                    path, declared, self.max_response_bytes
                );
                return Err(FigmaError::OversizedResponse {
                    declared,
                    limit: self.max_response_bytes,
                });
            }
            if declared > defaults::FIGMA_LARGE_RESPONSE_MB * BYTES_PER_MB {
                warn!("Large file detected: {}MB", declared / BYTES_PER_MB);
            }
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FigmaError::InvalidResponse(e.to_string()))
    }

    async fn fetch_nodes(&self, file_id: &str, node_id: &str) -> FigmaResult<NodesResponse> {
        self.get_json(
            &format!("/files/{}/nodes", file_id),
            &[("ids", node_id.to_string())],
        )
        .await
    }
}

/// The other spelling of a node id: share links use `1-2`, the API uses `1:2`
pub fn alternate_node_id(node_id: &str) -> Option<String> {
    if node_id.contains('-') {
        Some(node_id.replace('-', ":"))
    } else if node_id.contains(':') {
        Some(node_id.replace(':', "-"))
    } else {
        None
    }
}

#[async_trait]
impl FigmaApi for FigmaClient {
    async fn fetch_file(&self, file_id: &str) -> FigmaResult<FileResponse> {
        info!("Fetching Figma file: {}", file_id);
        self.get_json(&format!("/files/{}", file_id), &[]).await
    }

    async fn fetch_file_metadata_only(&self, file_id: &str) -> FigmaResult<FileResponse> {
        info!(
            "Fetching Figma file {} with depth={}",
            file_id,
            defaults::FIGMA_METADATA_DEPTH
        );
        self.get_json(
            &format!("/files/{}", file_id),
            &[("depth", defaults::FIGMA_METADATA_DEPTH.to_string())],
        )
        .await
    }

    async fn fetch_node(&self, file_id: &str, node_id: &str) -> FigmaResult<DesignNode> {
        info!("Requesting specific node: {} from file: {}", node_id, file_id);
        let mut response = self.fetch_nodes(file_id, node_id).await?;
        if let Some(Some(entry)) = response.nodes.remove(node_id) {
            return Ok(entry.document);
        }

        let mut available: Vec<String> = response.nodes.keys().cloned().collect();
        available.sort();

        if let Some(alternative) = alternate_node_id(node_id) {
            info!("Trying alternative node id format: {}", alternative);
            let mut alt_response = self.fetch_nodes(file_id, &alternative).await?;
            if let Some(Some(entry)) = alt_response.nodes.remove(&alternative) {
                info!("Found node with alternative format: {}", alternative);
                return Ok(entry.document);
            }
        }

        Err(FigmaError::NodeNotFound {
            node_id: node_id.to_string(),
            available,
        })
    }

    async fn fetch_images(
        &self,
        file_id: &str,
        node_ids: &[String],
    ) -> FigmaResult<HashMap<String, String>> {
        if node_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let response: ImagesResponse = self
            .get_json(
                &format!("/images/{}", file_id),
                &[
                    ("ids", node_ids.join(",")),
                    ("format", "png".to_string()),
                    ("scale", "2".to_string()),
                ],
            )
            .await?;

        if let Some(err) = response.err {
            return Err(FigmaError::InvalidResponse(err));
        }

        Ok(response
            .images
            .into_iter()
            .filter_map(|(id, url)| url.filter(|u| !u.is_empty()).map(|u| (id, u)))
            .collect())
    }

    async fn fetch_image_size(&self, image_url: &str) -> FigmaResult<Option<u64>> {
        // Rendered images live on a CDN and are fetched without the Figma token
        let response = self.http.head(image_url).send().await?;
        if !response.status().is_success() {
            return Err(FigmaError::Upstream {
                status: response.status().as_u16(),
                message: "image size lookup failed".to_string(),
            });
        }
        Ok(response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternate_node_id() {
        assert_eq!(alternate_node_id("12-34"), Some("12:34".to_string()));
        assert_eq!(alternate_node_id("12:34"), Some("12-34".to_string()));
        assert_eq!(alternate_node_id("1234"), None);
    }

    #[test]
    fn test_client_requires_token() {
        let config = FigmaConfig::default();
        assert!(matches!(
            FigmaClient::new(&config),
            Err(FigmaError::Unconfigured)
        ));

        let blank = FigmaConfig {
            access_token: Some("  ".to_string()),
            ..FigmaConfig::default()
        };
        assert!(matches!(FigmaClient::new(&blank), Err(FigmaError::Unconfigured)));
    }

    #[test]
    fn test_default_limits() {
        let config = FigmaConfig::default();
        assert_eq!(config.max_response_bytes, 50 * 1024 * 1024);
        assert_eq!(config.max_frames, 50);
        assert_eq!(config.image_batch_size, 10);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
