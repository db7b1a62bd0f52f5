//! HTTP transport seam and the default reqwest-backed implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::credentials::{Credentials, API_KEY_HEADER};
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestOptions, Verb};
use crate::response::{ResponseMeta, TransportResponse};

/// Executes a single HTTP call.
///
/// Implementations return `Err` only when no response was obtained. Any
/// completed exchange, whatever its status, is an `Ok(TransportResponse)`;
/// envelope inspection is the client's job.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Execute `verb` with fully resolved options (`options.url` is absolute).
    async fn send(&self, verb: Verb, options: RequestOptions) -> Result<TransportResponse>;

    async fn get(&self, options: RequestOptions) -> Result<TransportResponse> {
        self.send(Verb::Get, options).await
    }

    async fn put(&self, options: RequestOptions) -> Result<TransportResponse> {
        self.send(Verb::Put, options).await
    }

    async fn post(&self, options: RequestOptions) -> Result<TransportResponse> {
        self.send(Verb::Post, options).await
    }

    async fn del(&self, options: RequestOptions) -> Result<TransportResponse> {
        self.send(Verb::Del, options).await
    }
}

/// Transport backed by a `reqwest::Client` with a cookie store.
///
/// The cookie store keeps the session established by the authorize call
/// alive for the mutating call that follows it.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    enable_tracing: bool,
}

impl HttpTransport {
    /// Build a transport from client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed);

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            inner,
            enable_tracing: config.enable_tracing,
        })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self {
            inner,
            enable_tracing: true,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, verb: Verb, options: RequestOptions) -> Result<TransportResponse> {
        let mut url = url::Url::parse(&options.url)?;
        if !options.qs.is_empty() {
            url.query_pairs_mut().extend_pairs(&options.qs);
        }
        let mut req = self.inner.request(verb.to_reqwest(), url);

        match &options.auth {
            Some(Credentials::ApiKey(key)) => req = req.header(API_KEY_HEADER, key.as_str()),
            Some(Credentials::Basic { username, password }) => {
                req = req.basic_auth(username, Some(password))
            }
            None => {}
        }

        for (name, value) in &options.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(timeout) = options.timeout {
            req = req.timeout(timeout);
        }

        if let Some(ref body) = options.json {
            req = req.json(body);
        }

        if self.enable_tracing {
            debug!(verb = %verb, url = %options.url, "Sending request");
        }

        let response = req.send().await?;

        let status = response.status().as_u16();
        if self.enable_tracing {
            let content_length = response.content_length();
            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();

        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(TransportResponse {
            meta: ResponseMeta { status, headers },
            body,
        })
    }
}
