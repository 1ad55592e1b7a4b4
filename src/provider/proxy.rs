//! Provider that goes through the credential-hiding proxy endpoint
//!
//! Sends the same request shape as [`GeminiProvider`] but to our own
//! `/api/generate` route, which attaches the API key server-side. This is
//! how the browser frontend reaches the model; the CLI can use it to talk
//! to a running server without holding a key itself.

use super::{GenerateProvider, GenerateRequest, GenerateResponse, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct ProxyProvider {
    client: Client,
    base_url: String,
}

impl ProxyProvider {
    /// `base_url` is the proxy server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl GenerateProvider for ProxyProvider {
    fn name(&self) -> &str {
        "proxy"
    }

    fn model(&self) -> &str {
        // The proxy decides the model; we only see the relay.
        "proxied"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream { status, body });
        }

        let body: GenerateResponse = response.json().await?;
        body.text()
            .map(str::to_string)
            .ok_or(ProviderError::MissingText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let provider = ProxyProvider::new("http://localhost:8080");
        assert_eq!(provider.endpoint(), "http://localhost:8080/api/generate");
    }
}
