use super::{store_document_form, DocumentStore, StoreResponse};
use crate::config::{ApiToken, Config};
use crate::error::{Error, Result};
use crate::models::Metadata;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client for the RAG EM API `storeDocument` action
pub struct RagApiClient {
    client: Client,
    api_url: Url,
    token: ApiToken,
}

impl RagApiClient {
    pub fn new(api_url: &str, token: ApiToken, timeout: Duration) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| Error::Config(format!("Invalid RAG API URL '{}': {}", api_url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// Build a client from config, resolving the token before anything
    /// touches the network
    pub fn from_config(config: &Config, token: Option<String>) -> Result<Self> {
        let token = config.resolve_token(token)?;
        Self::new(&config.api_url, token, config.timeout())
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }
}

#[async_trait]
impl DocumentStore for RagApiClient {
    async fn store_document(
        &self,
        title: &str,
        content: &str,
        metadata: Option<&Metadata>,
    ) -> Result<StoreResponse> {
        let form = store_document_form(&self.token, title, content, metadata)?;
        debug!(title, chars = content.len(), "POST storeDocument to {}", self.api_url);

        let response = self
            .client
            .post(self.api_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(Error::ApiCall)?
            .error_for_status()
            .map_err(Error::ApiCall)?;

        response.json::<StoreResponse>().await.map_err(Error::ApiCall)
    }
}
