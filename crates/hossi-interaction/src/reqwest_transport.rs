//! [`Transport`] over `reqwest`.

use crate::http::{ApiRequest, ApiResponse, HttpError, Transport};
use async_trait::async_trait;
use reqwest::Client;

/// Production transport. One attempt per request, reqwest's default timeouts.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, HttpError> {
        let mut builder = self.client.request(request.method, &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::Transport(format!("Request to {} failed: {}", request.url, e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            HttpError::Transport(format!("Failed to read response from {}: {}", request.url, e))
        })?;

        Ok(ApiResponse { status, body })
    }
}
