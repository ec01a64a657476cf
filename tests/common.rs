//! Common builders and fixtures for integration tests.

#![allow(dead_code)]

use pushrelay::config::PushConfig;
use pushrelay::dispatch::Dispatcher;
use pushrelay::notification::expo::ExpoPushClient;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

/// The path the mock push endpoint is mounted on.
pub const PUSH_PATH: &str = "/--/api/v2/push/send";

/// Builds one notification request object in the inbound event shape.
pub fn request_json(token: &str) -> Value {
    json!({
        "token": token,
        "notificationData": {
            "title": "title",
            "body": "body",
            "data": {"source": "integration-test"},
        },
    })
}

/// Builds an event: an array of batches, each batch an array of requests
/// for the given tokens.
pub fn event_json(batches: &[&[&str]]) -> Value {
    Value::Array(
        batches
            .iter()
            .map(|batch| Value::Array(batch.iter().map(|token| request_json(token)).collect()))
            .collect(),
    )
}

/// A dispatcher whose client points at the given mock server.
pub fn dispatcher_for(server: &MockServer) -> Dispatcher<ExpoPushClient> {
    let client = ExpoPushClient::new(&PushConfig {
        endpoint: format!("{}{}", server.uri(), PUSH_PATH),
        timeout_ms: 10_000,
    })
    .unwrap();
    Dispatcher::new(Arc::new(client))
}

/// A dispatcher whose client points at an address nothing listens on, so
/// every delivery settles as a failure.
pub fn unreachable_dispatcher() -> Dispatcher<ExpoPushClient> {
    let client = ExpoPushClient::new(&PushConfig {
        endpoint: "http://127.0.0.1:1/push/send".to_string(),
        timeout_ms: 10_000,
    })
    .unwrap();
    Dispatcher::new(Arc::new(client))
}
