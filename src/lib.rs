//! # rally-wsapi
//!
//! A Rally Web Services API (WSAPI) client library for Rust.
//!
//! Reads, creates, updates and deletes go through a single request layer
//! that unwraps the service's response envelopes, turns envelope `Errors`
//! into failures and performs the security-token handshake in front of
//! every mutating call.
//!
//! ## Security
//!
//! - API keys and passwords are redacted in Debug output
//! - Tracing spans skip request options and credentials
//! - Error messages sanitize keys, session ids and security tokens
//!
//! ## Crates
//!
//! - **rally-wsapi-client** - Request client, transport seam, envelopes, errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rally_wsapi::{ClientConfig, RequestOptions, WsapiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // RALLY_API_KEY or RALLY_USERNAME/RALLY_PASSWORD
//!     let client = WsapiClient::new(ClientConfig::from_env())?;
//!
//!     let defect = client
//!         .get(RequestOptions::new("/defect/12345").query("fetch", "Name,State"), None)
//!         .await?;
//!     println!("{:?}", defect.object());
//!
//!     Ok(())
//! }
//! ```

// Re-export the client crate for convenient access
pub use rally_wsapi_client as client;

// Re-export commonly used types at the top level
pub use rally_wsapi_client::{
    Callback, ClientConfig, Credentials, Error, ErrorKind, Payload, Pending, RequestDefaults,
    RequestOptions, Result, Verb, WsapiClient,
};
