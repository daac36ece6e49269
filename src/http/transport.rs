//! Generic HTTP transport
//!
//! The client never talks to the network directly; it hands resolved requests
//! to a `Transport`. The default implementation is reqwest with a cookie
//! store, so the backend's HTTP-only session cookie rides along on every call.

use super::request::{ApiRequest, ApiResponse};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

/// Sends one resolved request and buffers the response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request` against the fully resolved `url`
    ///
    /// Malformed URLs and unserializable bodies fail here with
    /// [`Error::Transport`] or [`Error::InvalidUrl`].
    async fn execute(&self, url: &str, request: &ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport from client config (timeout, user agent, default headers)
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .default_headers(header_map(&config.default_headers)?)
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, url: &str, request: &ApiRequest) -> Result<ApiResponse> {
        let url = url::Url::parse(url)?;
        let mut req = self.client.request(request.method.clone(), url);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let response = req.send().await?;
        ApiResponse::from_reqwest(response).await
    }
}

fn header_map(headers: &std::collections::HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::invalid_value("default_headers", format!("{key}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_value("default_headers", format!("{key}: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}
