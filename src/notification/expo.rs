//! A client for the Expo push-delivery HTTP endpoint.

use crate::config::PushConfig;
use crate::core::{DeliveryOutcome, NotificationRequest, PushClient};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

/// A client that delivers notifications to the Expo push endpoint.
///
/// One `reqwest::Client` is built at construction and shared across all
/// concurrent sends; the per-request timeout comes from the configuration.
pub struct ExpoPushClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ExpoPushClient {
    /// Creates a new `ExpoPushClient` from the push configuration.
    pub fn new(config: &PushConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Builds the wire payload the endpoint expects for one notification.
    fn payload(request: &NotificationRequest) -> Value {
        let content = &request.notification_data;
        json!({
            "to": request.token,
            "title": content.title,
            "body": content.body,
            "data": content.data,
            "priority": "high",
        })
    }
}

#[async_trait]
impl PushClient for ExpoPushClient {
    /// Issues a single POST for the notification and settles the outcome.
    ///
    /// A 2xx response is a delivery; any other status or transport error
    /// (connect failure, timeout) becomes a failed outcome. This never
    /// returns control via panic or error.
    async fn send(&self, request: &NotificationRequest) -> DeliveryOutcome {
        let payload = Self::payload(request);

        match self.http.post(&self.endpoint).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                // Delivery is decided by the status; a non-JSON body is kept as null.
                let body = response.json::<Value>().await.unwrap_or(Value::Null);
                info!(token = %request.token, "Notification sent successfully");
                DeliveryOutcome::Delivered(body)
            }
            Ok(response) => {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                error!(
                    token = %request.token,
                    status = %status,
                    body = %text,
                    "Push endpoint rejected notification"
                );
                DeliveryOutcome::Failed(format!(
                    "push endpoint returned status {}: {}",
                    status, text
                ))
            }
            Err(e) => {
                error!(token = %request.token, error = %e, "Failed to send notification");
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }
}
