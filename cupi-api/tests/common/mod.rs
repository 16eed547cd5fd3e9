//! Shared test utilities for integration tests.

#![allow(dead_code)]

use cupi_api::{ApiClient, Oid};
use cupi_core::config::ServerConfig;
use wiremock::MockServer;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "cisco123";

/// Start a mock server and a client pointed at it.
pub async fn start() -> (MockServer, ApiClient) {
    cupi_core::logging::init_console_logging("cupi_api=debug");
    let server = MockServer::start().await;
    let client = client_for(&server.uri());
    (server, client)
}

/// Client for an arbitrary base URI (scheme included).
pub fn client_for(uri: &str) -> ApiClient {
    let mut config = ServerConfig::new(uri, USERNAME, PASSWORD);
    config.timeout_ms = 5_000;
    ApiClient::new(&config).expect("failed to build test client")
}

/// A fresh server-style object id.
pub fn fake_oid() -> Oid {
    Oid::new(uuid::Uuid::new_v4().to_string())
}

/// Body the server returns for a successful create.
pub fn location_body(collection: &str, oid: &Oid) -> String {
    format!("/vmrest/{collection}/{oid}")
}
