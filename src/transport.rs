//! One-shot JSON POST to the classification endpoint.

use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// The exchange produced no response at all.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid endpoint URL '{0}'")]
    InvalidUrl(String),
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A settled exchange. Any status counts, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }
}

pub trait Transport: Send + Sync {
    /// POSTs `body` as `application/json` to `path`.
    fn post_json<'a>(
        &'a self,
        path: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpReply, TransportError>>;
}

/// `reqwest`-backed transport rooted at a base URL. No timeout, no retry:
/// a request may stay pending for as long as the server holds it.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self { base_url: base_url.into(), client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<reqwest::Url, TransportError> {
        let base = reqwest::Url::parse(&self.base_url)
            .map_err(|_| TransportError::InvalidUrl(self.base_url.clone()))?;
        base.join(path)
            .map_err(|_| TransportError::InvalidUrl(format!("{}{}", self.base_url, path)))
    }

    async fn send(&self, path: &str, body: Vec<u8>) -> Result<HttpReply, TransportError> {
        let url = self.url_for(path)?;
        tracing::debug!(%url, bytes = body.len(), "POST");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(status, bytes = body.len(), "response settled");

        Ok(HttpReply { status, body })
    }
}

impl Transport for HttpTransport {
    fn post_json<'a>(
        &'a self,
        path: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpReply, TransportError>> {
        Box::pin(self.send(path, body))
    }
}
