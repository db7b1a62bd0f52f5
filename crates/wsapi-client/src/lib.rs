//! # rally-wsapi-client
//!
//! Request layer for the Rally Web Services API (WSAPI).
//!
//! This crate provides:
//! - Envelope unwrapping for `Result` and `OperationResult` responses
//! - Envelope `Errors` surfaced as failures, `Warnings` passed through
//! - The security-token handshake in front of every mutating call
//! - Results delivered through a future, a callback, or both
//! - A pluggable [`Transport`] with a reqwest-backed default
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      WsapiClient                            │
//! │  - get / post / put / delete                                │
//! │  - do_request: envelope + error translation + delivery      │
//! │  - do_secured_request: /security/authorize, then the verb   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Transport (HttpTransport)                   │
//! │  - One HTTP call per invocation                             │
//! │  - Credentials, query string, JSON body, cookies            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use rally_wsapi_client::{ClientConfig, RequestOptions, WsapiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rally_wsapi_client::Error> {
//!     let client = WsapiClient::new(
//!         ClientConfig::builder().with_api_key("_abc123").build(),
//!     )?;
//!
//!     let created = client
//!         .post(
//!             RequestOptions::new("/defect/create")
//!                 .json_value(serde_json::json!({"Defect": {"Name": "Crash on save"}})),
//!             None,
//!         )
//!         .await?;
//!
//!     println!("{:?}", created.object());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod credentials;
mod error;
mod pending;
mod request;
mod response;
mod transport;

pub use client::WsapiClient;
pub use config::{ClientConfig, ClientConfigBuilder, IntegrationInfo};
pub use credentials::{Credentials, API_KEY_HEADER};
pub use error::{Error, ErrorKind, Result};
pub use pending::{Callback, Pending};
pub use request::{RequestDefaults, RequestOptions, Verb, SECURITY_TOKEN_PARAM};
pub use response::{unwrap_envelope, Envelope, Payload, ResponseMeta, TransportResponse};
pub use transport::{HttpTransport, Transport};

/// Default WSAPI server.
pub const DEFAULT_SERVER: &str = "https://rally1.rallydev.com";

/// Default WSAPI version.
pub const DEFAULT_API_VERSION: &str = "v2.0";

/// Path between the server and the API version.
pub const WSAPI_PATH: &str = "/slm/webservice/";

/// Endpoint issuing security tokens, relative to the WSAPI URL.
pub const SECURITY_AUTHORIZE_PATH: &str = "/security/authorize";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("rally-wsapi/", env!("CARGO_PKG_VERSION"));
