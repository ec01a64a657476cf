//! The invocation boundary: decodes the inbound event, drives the dispatcher,
//! and reduces batch summaries into the structured response.

use crate::core::{BatchSummary, HandlerResponse, NotificationRequest, PushClient};
use crate::dispatch::Dispatcher;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

/// The inbound event: an ordered sequence of notification batches.
pub type Event = Vec<Vec<NotificationRequest>>;

/// Errors that abort processing of an entire invocation.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("invalid event payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Decodes the raw event value into batches of notification requests.
pub fn decode_event(event: Value) -> Result<Event, EventError> {
    Ok(serde_json::from_value(event)?)
}

/// Processes one invocation and always returns a structured response.
///
/// Delivery failures are aggregated into counts; a malformed event is the
/// only whole-invocation failure, and it too is reported as a response
/// rather than an error. The caller never sees a panic or an `Err`.
pub async fn handle<C: PushClient + 'static>(
    dispatcher: &Dispatcher<C>,
    event: Value,
) -> HandlerResponse {
    let batches = match decode_event(event) {
        Ok(batches) => batches,
        Err(e) => {
            error!(error = %e, "Unable to process notification event");
            return HandlerResponse::Failed {
                error: e.to_string(),
            };
        }
    };

    let summaries = dispatcher.dispatch_all(batches).await;
    aggregate(summaries)
}

/// Reduces per-batch summaries into the overall response.
fn aggregate(batch_results: Vec<BatchSummary>) -> HandlerResponse {
    let total_successes: usize = batch_results.iter().map(|s| s.successes).sum();
    let total_failures: usize = batch_results.iter().map(|s| s.failures).sum();

    if total_failures > 0 {
        error!(
            total_successes,
            total_failures,
            "Some notifications failed to send"
        );
        HandlerResponse::PartialSuccess {
            total_successes,
            total_failures,
            batch_results,
        }
    } else {
        info!(total = total_successes, "All notifications sent successfully");
        HandlerResponse::Success {
            total_notifications_sent: total_successes,
            batch_results,
        }
    }
}
