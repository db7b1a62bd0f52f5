//! Shared fixtures for the integration suite.

use rally_wsapi::{ClientConfig, WsapiClient};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_VERSION: &str = "v2.0";
pub const API_KEY: &str = "_integrationkey";

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Path of a WSAPI resource on the mock server.
pub fn wsapi_path(resource: &str) -> String {
    format!("/slm/webservice/{API_VERSION}{resource}")
}

pub async fn start() -> MockServer {
    init_tracing();
    MockServer::start().await
}

pub fn client(server: &MockServer) -> WsapiClient {
    WsapiClient::new(
        ClientConfig::builder()
            .with_server(server.uri())
            .with_api_version(API_VERSION)
            .with_api_key(API_KEY)
            .build(),
    )
    .expect("Failed to create client")
}

/// `{"Result": {...}}` with empty `Errors`/`Warnings` unless given.
pub fn result(fields: Value) -> Value {
    json!({ "Result": with_lists(fields) })
}

/// `{"OperationResult": {...}}` with empty `Errors`/`Warnings` unless given.
pub fn operation_result(fields: Value) -> Value {
    json!({ "OperationResult": with_lists(fields) })
}

fn with_lists(mut fields: Value) -> Value {
    if let Value::Object(map) = &mut fields {
        map.entry("Errors").or_insert_with(|| json!([]));
        map.entry("Warnings").or_insert_with(|| json!([]));
    }
    fields
}

/// Mount an authorize endpoint handing out `token`.
pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path(wsapi_path("/security/authorize")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(operation_result(json!({ "SecurityToken": token }))),
        )
        .mount(server)
        .await;
}
