//! The request client: envelope handling, the security-token handshake,
//! and the four public verbs.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::pending::{Callback, Pending};
use crate::request::{RequestDefaults, RequestOptions, Verb};
use crate::response::{unwrap_envelope, Payload};
use crate::transport::{HttpTransport, Transport};
use crate::SECURITY_AUTHORIZE_PATH;

/// Client for the WSAPI.
///
/// Reads go straight to the transport. Mutating calls (`post`, `put`,
/// `delete`) first fetch a security token from `/security/authorize` and
/// attach it as the `key` query parameter. Every call fetches its own
/// token; nothing is shared between calls, so the client is cheap to clone
/// and safe to use concurrently.
///
/// # Example
///
/// ```rust,ignore
/// use rally_wsapi_client::{Callback, ClientConfig, RequestOptions, WsapiClient};
///
/// let client = WsapiClient::new(
///     ClientConfig::builder().with_api_key("_abc123").build(),
/// )?;
///
/// // Future style
/// let defect = client.get(RequestOptions::new("/defect/12345"), None).await?;
///
/// // Callback style, same call
/// client.put(
///     RequestOptions::new("/defect/12345").json_value(json!({"Defect": {"State": "Fixed"}})),
///     Some(Callback::new(|outcome| match outcome {
///         Ok(payload) => println!("updated: {:?}", payload.object()),
///         Err(err) => eprintln!("failed: {:?}", err.errors()),
///     })),
/// );
/// ```
#[derive(Clone)]
pub struct WsapiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    wsapi_url: String,
    defaults: RequestDefaults,
}

impl std::fmt::Debug for WsapiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsapiClient")
            .field("wsapi_url", &self.inner.wsapi_url)
            .field("transport", &self.inner.transport)
            .field("defaults", &self.inner.defaults)
            .finish()
    }
}

impl WsapiClient {
    /// Create a client using the default HTTP transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        url::Url::parse(&config.server)?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client configured from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Create a client that sends every call through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                wsapi_url: config.wsapi_url(),
                defaults: config.effective_defaults(),
                transport,
            }),
        }
    }

    /// The versioned base URL every call is made against.
    pub fn wsapi_url(&self) -> &str {
        &self.inner.wsapi_url
    }

    /// Defaults merged into every call.
    pub fn defaults(&self) -> &RequestDefaults {
        &self.inner.defaults
    }

    // =========================================================================
    // Async operations
    // =========================================================================

    /// Issue one call and unwrap its envelope.
    ///
    /// `options.url` is relative to [`wsapi_url`](Self::wsapi_url).
    #[instrument(skip(self, verb, options), fields(verb = %verb, url = %options.url))]
    pub async fn request(&self, verb: Verb, options: RequestOptions) -> Result<Payload> {
        let path = options.url.clone();
        let mut options = options.merged_with(&self.inner.defaults);
        options.url = format!("{}{}", self.inner.wsapi_url, path);

        let transport = &self.inner.transport;
        let response = match verb {
            Verb::Get => transport.get(options).await,
            Verb::Put => transport.put(options).await,
            Verb::Post => transport.post(options).await,
            Verb::Del => transport.del(options).await,
        }
        .inspect_err(|err| warn!(error = %err, "Transport error"))?;

        debug!(status = response.meta.status, "Response received");

        unwrap_envelope(&path, response).inspect_err(|err| {
            if err.is_wsapi() {
                warn!(errors = ?err.errors(), "WSAPI returned errors");
            }
        })
    }

    /// Fetch a security token, then issue the call with `qs.key` set.
    ///
    /// A failed token fetch ends the call with that same error; the
    /// mutating call is never attempted.
    #[instrument(skip(self, verb, options), fields(verb = %verb, url = %options.url))]
    pub async fn secured_request(&self, verb: Verb, options: RequestOptions) -> Result<Payload> {
        let authorized = self
            .request(Verb::Get, RequestOptions::new(SECURITY_AUTHORIZE_PATH))
            .await
            .inspect_err(|err| warn!(error = %err, "Security token fetch failed"))?;

        let token = authorized
            .security_token()
            .ok_or_else(|| Error::new(ErrorKind::MissingSecurityToken))?;

        debug!("Security token acquired");
        self.request(verb, options.with_security_token(token)).await
    }

    // =========================================================================
    // Deferred operations
    // =========================================================================

    /// Start [`request`](Self::request) and return its deferred outcome,
    /// notifying `callback` as well when one is given.
    pub fn do_request(
        &self,
        verb: Verb,
        options: RequestOptions,
        callback: Option<Callback>,
    ) -> Pending {
        let client = self.clone();
        Pending::spawn(async move { client.request(verb, options).await }, callback)
    }

    /// Start [`secured_request`](Self::secured_request) and return its
    /// deferred outcome, notifying `callback` as well when one is given.
    pub fn do_secured_request(
        &self,
        verb: Verb,
        options: RequestOptions,
        callback: Option<Callback>,
    ) -> Pending {
        let client = self.clone();
        Pending::spawn(
            async move { client.secured_request(verb, options).await },
            callback,
        )
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// Read.
    pub fn get(&self, options: RequestOptions, callback: Option<Callback>) -> Pending {
        self.do_request(Verb::Get, options, callback)
    }

    /// Create.
    pub fn post(&self, options: RequestOptions, callback: Option<Callback>) -> Pending {
        self.do_secured_request(Verb::Post, options, callback)
    }

    /// Update.
    pub fn put(&self, options: RequestOptions, callback: Option<Callback>) -> Pending {
        self.do_secured_request(Verb::Put, options, callback)
    }

    /// Delete.
    pub fn delete(&self, options: RequestOptions, callback: Option<Callback>) -> Pending {
        self.do_secured_request(Verb::Del, options, callback)
    }
}
