use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::provider::Headers;

/// Status and raw body of a completed POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, headers: &Headers, body: &Value) -> Result<HttpReply>;
}

/// reqwest with library defaults: no timeout override, default TLS.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, url: &str, headers: &Headers, body: &Value) -> Result<HttpReply> {
        let mut req = self.client.post(url);
        for (k, v) in headers {
            req = req.header(k.as_str(), v.as_str());
        }
        let resp = req
            .body(serde_json::to_vec(body)?)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = resp.status().as_u16();
        let body = resp.text().await.context("failed to read response body")?;
        Ok(HttpReply { status, body })
    }
}
