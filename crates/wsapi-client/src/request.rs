//! Request options passed through the client to a transport.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::credentials::Credentials;
use crate::error::Result;

/// Query parameter carrying the security token on mutating calls.
pub const SECURITY_TOKEN_PARAM: &str = "key";

/// HTTP verb understood by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
    Post,
    Del,
}

impl Verb {
    /// The verb token (`get`, `put`, `post`, `del`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Put => "put",
            Verb::Post => "post",
            Verb::Del => "del",
        }
    }

    /// Returns true for verbs that need a security token.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Verb::Get)
    }

    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Put => reqwest::Method::PUT,
            Verb::Post => reqwest::Method::POST,
            Verb::Del => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single call.
///
/// `url` is relative to the WSAPI URL when handed to the client. By the time
/// a transport sees the options, `url` is absolute and configured defaults
/// have been merged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub url: String,
    pub qs: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub json: Option<serde_json::Value>,
    pub timeout: Option<Duration>,
    pub auth: Option<Credentials>,
}

impl RequestOptions {
    /// Options targeting the given path.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.qs.insert(name.into(), value.into());
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.json = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set raw JSON body.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Set a per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a security token as `qs.key`, keeping any other parameters.
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.qs.insert(SECURITY_TOKEN_PARAM.to_string(), token.into());
        self
    }

    /// The security token attached to these options, if any.
    pub fn security_token(&self) -> Option<&str> {
        self.qs.get(SECURITY_TOKEN_PARAM).map(String::as_str)
    }

    /// Merge defaults underneath these options. Per-call values win.
    pub(crate) fn merged_with(mut self, defaults: &RequestDefaults) -> Self {
        for (name, value) in &defaults.qs {
            self.qs.entry(name.clone()).or_insert_with(|| value.clone());
        }
        for (name, value) in &defaults.headers {
            self.headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        if self.timeout.is_none() {
            self.timeout = defaults.timeout;
        }
        if self.auth.is_none() {
            self.auth = defaults.auth.clone();
        }
        self
    }
}

/// Default options applied to every call made by a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestDefaults {
    pub headers: BTreeMap<String, String>,
    pub qs: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
    pub(crate) auth: Option<Credentials>,
}

impl RequestDefaults {
    /// Add a default header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a default query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.qs.insert(name.into(), value.into());
        self
    }

    /// Set a default per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
