//! Client configuration.

use std::time::Duration;

use crate::credentials::Credentials;
use crate::request::RequestDefaults;
use crate::{DEFAULT_API_VERSION, DEFAULT_SERVER, WSAPI_PATH};

/// Configuration for a [`WsapiClient`](crate::WsapiClient).
///
/// Immutable once the client is built.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `https://rally1.rallydev.com`.
    pub server: String,
    /// API version segment, e.g. `v2.0`.
    pub api_version: String,
    /// Defaults merged into every call.
    pub request_options: RequestDefaults,
    /// Credentials applied to every call.
    pub credentials: Option<Credentials>,
    /// Integration identification headers.
    pub integration: IntegrationInfo,
    /// Request timeout for the default transport.
    pub timeout: Duration,
    /// Connection timeout for the default transport.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Accept gzip/deflate responses.
    pub accept_compressed: bool,
    /// Whether to enable request/response tracing.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_options: RequestDefaults::default(),
            credentials: None,
            integration: IntegrationInfo::default(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: crate::USER_AGENT.to_string(),
            accept_compressed: true,
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// - `RALLY_SERVER` (default: `https://rally1.rallydev.com`)
    /// - `RALLY_API_VERSION` (default: `v2.0`)
    /// - credentials as read by [`Credentials::from_env`]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut builder = Self::builder();
        if let Some(server) = lookup("RALLY_SERVER").filter(|v| !v.is_empty()) {
            builder = builder.with_server(server);
        }
        if let Some(version) = lookup("RALLY_API_VERSION").filter(|v| !v.is_empty()) {
            builder = builder.with_api_version(version);
        }
        if let Some(creds) = Credentials::from_lookup(lookup) {
            builder = builder.with_credentials(creds);
        }
        builder.build()
    }

    /// The versioned service endpoint: `server + "/slm/webservice/" + api_version`.
    pub fn wsapi_url(&self) -> String {
        format!("{}{}{}", self.server, WSAPI_PATH, self.api_version)
    }

    /// Request defaults with credentials and integration headers folded in.
    pub(crate) fn effective_defaults(&self) -> RequestDefaults {
        let mut defaults = self.request_options.clone();
        for (name, value) in self.integration.headers() {
            defaults.headers.entry(name).or_insert(value);
        }
        if defaults.auth.is_none() {
            defaults.auth = self.credentials.clone();
        }
        defaults
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server root.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.config.server = server.into();
        self
    }

    /// Set the API version (e.g. `v2.0`).
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set the defaults merged into every call.
    pub fn with_request_options(mut self, defaults: RequestDefaults) -> Self {
        self.config.request_options = defaults;
        self
    }

    /// Authenticate with an API key.
    pub fn with_api_key(self, key: impl Into<String>) -> Self {
        self.with_credentials(Credentials::api_key(key))
    }

    /// Authenticate with username and password.
    pub fn with_basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.with_credentials(Credentials::basic(username, password))
    }

    /// Set credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = Some(credentials);
        self
    }

    /// Identify the calling integration.
    pub fn with_integration(mut self, integration: IntegrationInfo) -> Self {
        self.config.integration = integration;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Accept compressed responses.
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.accept_compressed = enabled;
        self
    }

    /// Enable or disable request/response tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Identifies the application making calls, sent as `X-RallyIntegration*` headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationInfo {
    pub name: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
}

impl IntegrationInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Header pairs; library, platform and OS are always present.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            (
                "X-RallyIntegrationLibrary".to_string(),
                crate::USER_AGENT.to_string(),
            ),
            ("X-RallyIntegrationPlatform".to_string(), "Rust".to_string()),
            (
                "X-RallyIntegrationOS".to_string(),
                std::env::consts::OS.to_string(),
            ),
        ];
        let optional = [
            ("X-RallyIntegrationName", &self.name),
            ("X-RallyIntegrationVendor", &self.vendor),
            ("X-RallyIntegrationVersion", &self.version),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                headers.push((name.to_string(), value.clone()));
            }
        }
        headers
    }
}
