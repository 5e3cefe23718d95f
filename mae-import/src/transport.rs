//! Transport seam between the importer and the network.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use url::Url;

use crate::request::ProcessRequest;

/// Status and body of a completed HTTP exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends requests to the parsing service.
///
/// `Err` is reserved for transport failures where no response arrived;
/// non-2xx statuses come back as `Ok` so the response parser can classify
/// them.
#[async_trait]
pub trait StatementTransport: Send + Sync {
    async fn post_statement(&self, request: ProcessRequest) -> Result<RawResponse>;

    async fn get(&self, url: Url) -> Result<RawResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// `timeout: None` keeps reqwest's default (no overall timeout).
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().context("build http client")?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn finish(resp: reqwest::Response) -> Result<RawResponse> {
        let status = resp.status().as_u16();
        let body = resp.bytes().await.context("read response body")?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl StatementTransport for HttpTransport {
    async fn post_statement(&self, request: ProcessRequest) -> Result<RawResponse> {
        let url = request.url.clone();
        tracing::debug!(%url, mode = %request.mode, bytes = request.bytes.len(), "posting statement");

        let form = request.into_form()?;
        let resp = self
            .client
            .post(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        Self::finish(resp).await
    }

    async fn get(&self, url: Url) -> Result<RawResponse> {
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        Self::finish(resp).await
    }
}
