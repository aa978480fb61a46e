use crate::error::{OperandError, Result};
use crate::traits::ResourceClient;
use async_trait::async_trait;
use hco_core::ResourceKey;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

/// Lightweight HTTP client for reading and writing operand resources
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse(method: &str, path: &str, resp: Response) -> Result<serde_json::Value> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OperandError::api_request_failed(
                method,
                path,
                format!("status {}: {}", status, body),
            ));
        }

        resp.json::<serde_json::Value>().await.map_err(|e| {
            OperandError::api_request_failed(method, path, format!("invalid response body: {}", e))
        })
    }
}

#[async_trait]
impl ResourceClient for ApiClient {
    /// GET {resource path}
    async fn get(&self, key: &ResourceKey) -> Result<Option<serde_json::Value>> {
        let path = key.api_path();
        debug!("GET {}", path);

        let resp = self
            .client
            .get(self.url(&path))
            .send()
            .await
            .map_err(|e| OperandError::api_request_failed("GET", &path, e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::parse("GET", &path, resp).await.map(Some)
    }

    /// POST {collection path}
    async fn create(
        &self,
        key: &ResourceKey,
        object: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let path = key.collection_path();
        debug!("POST {}", path);

        let resp = self
            .client
            .post(self.url(&path))
            .json(object)
            .send()
            .await
            .map_err(|e| OperandError::api_request_failed("POST", &path, e.to_string()))?;

        Self::parse("POST", &path, resp).await
    }

    /// PUT {resource path}
    async fn update(
        &self,
        key: &ResourceKey,
        object: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let path = key.api_path();
        debug!("PUT {}", path);

        let resp = self
            .client
            .put(self.url(&path))
            .json(object)
            .send()
            .await
            .map_err(|e| OperandError::api_request_failed("PUT", &path, e.to_string()))?;

        Self::parse("PUT", &path, resp).await
    }
}
