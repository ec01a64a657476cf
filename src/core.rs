//! Core domain types and service traits for pushrelay
//!
//! This module defines the data structures that flow through one invocation
//! of the relay, and the trait contract for the delivery client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One notification to deliver to a single device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationRequest {
    /// The recipient device token, as issued by the push-delivery service.
    pub token: String,
    /// The message content to deliver.
    #[serde(rename = "notificationData")]
    pub notification_data: NotificationContent,
}

/// The content of a notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NotificationContent {
    /// The notification title shown on the device.
    pub title: String,
    /// The notification body text.
    pub body: String,
    /// Arbitrary structured payload forwarded to the receiving app.
    #[serde(default)]
    pub data: Value,
}

/// The settled result of one delivery attempt.
///
/// A delivery attempt never escapes as an error; every failure mode is
/// captured here so that sibling deliveries are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// The endpoint accepted the notification. Carries the parsed response body.
    Delivered(Value),
    /// The delivery failed. Carries a human-readable description.
    Failed(String),
}

impl DeliveryOutcome {
    /// Returns `true` if the notification was accepted by the endpoint.
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered(_))
    }
}

/// Success and failure counts for one settled batch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSummary {
    /// Number of notifications the endpoint accepted.
    pub successes: usize,
    /// Number of notifications that failed to deliver.
    pub failures: usize,
}

impl BatchSummary {
    /// A summary for a batch that failed as a whole, before any of its
    /// requests could settle individually.
    pub fn all_failed(batch_size: usize) -> Self {
        Self {
            successes: 0,
            failures: batch_size,
        }
    }
}

/// The structured result returned to the invoking platform.
///
/// Serializes to the wire contract: a `status` discriminant plus the
/// aggregate counts and raw per-batch summaries for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status")]
pub enum HandlerResponse {
    /// Every notification in every batch was delivered.
    Success {
        #[serde(rename = "totalNotificationsSent")]
        total_notifications_sent: usize,
        #[serde(rename = "batchResults")]
        batch_results: Vec<BatchSummary>,
    },
    /// At least one notification failed to deliver.
    #[serde(rename = "Partial Success")]
    PartialSuccess {
        #[serde(rename = "totalSuccesses")]
        total_successes: usize,
        #[serde(rename = "totalFailures")]
        total_failures: usize,
        #[serde(rename = "batchResults")]
        batch_results: Vec<BatchSummary>,
    },
    /// The event could not be processed at all.
    Failed { error: String },
}

// =============================================================================
// Service Traits
// =============================================================================

/// Delivers a single notification to the push endpoint.
#[async_trait]
pub trait PushClient: Send + Sync {
    /// Attempts to deliver one notification.
    ///
    /// # Returns
    /// The settled outcome of the attempt. Implementations must capture all
    /// failure modes (transport errors, timeouts, non-2xx statuses) as
    /// `DeliveryOutcome::Failed` rather than panicking or aborting.
    async fn send(&self, request: &NotificationRequest) -> DeliveryOutcome;
}
