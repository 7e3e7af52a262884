//! reqwest-backed transport holding the session cookie jar.

use reqwest::{Client, Url};

use super::{Backend, HttpReply};
use crate::config::ConsoleConfig;
use crate::errors::ClientError;

/// HTTP transport against the real backend.
///
/// The backend sets the session as an HTTP-only cookie on login; the client's
/// cookie store replays it on every later request, so no credential is ever
/// handled explicitly.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &ConsoleConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.api_url)))?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&'static str, String)]) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn read(response: reqwest::Response) -> Result<HttpReply, ClientError> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(HttpReply { status, body })
    }
}

impl Backend for HttpBackend {
    async fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<HttpReply, ClientError> {
        let url = self.url(path, query)?;
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        Self::read(response).await
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpReply, ClientError> {
        let url = self.url(path, &[])?;
        tracing::debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        Self::read(response).await
    }
}
