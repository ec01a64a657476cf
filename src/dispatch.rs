//! Concurrent fan-out of notification batches and per-batch aggregation.
//!
//! All sends within a batch are issued without waiting on each other, and all
//! batches run concurrently. Summaries are only computed once everything has
//! settled; an individual failure never aborts sibling work.

use crate::core::{BatchSummary, NotificationRequest, PushClient};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error};

/// Fans notification batches out to a `PushClient` and aggregates outcomes.
pub struct Dispatcher<C: PushClient> {
    client: Arc<C>,
}

impl<C: PushClient> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: PushClient + 'static> Dispatcher<C> {
    /// Creates a new `Dispatcher` over the given client.
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Delivers every notification in the batch concurrently and waits for
    /// all of them to settle, then counts the outcomes.
    pub async fn process_batch(&self, batch: Vec<NotificationRequest>) -> BatchSummary {
        let sends = batch.iter().map(|request| self.client.send(request));
        let outcomes = join_all(sends).await;

        let mut summary = BatchSummary::default();
        for outcome in &outcomes {
            if outcome.is_delivered() {
                summary.successes += 1;
            } else {
                summary.failures += 1;
            }
        }

        debug!(
            successes = summary.successes,
            failures = summary.failures,
            "Batch settled"
        );
        summary
    }

    /// Processes all batches concurrently and returns one summary per batch,
    /// in the order the batches were given.
    ///
    /// Each batch runs on its own task. A batch task that dies before
    /// settling (a panic inside the client) is counted as a failure of every
    /// request in that batch, so the returned summaries always account for
    /// the full request count.
    pub async fn dispatch_all(&self, batches: Vec<Vec<NotificationRequest>>) -> Vec<BatchSummary> {
        let (sizes, handles): (Vec<_>, Vec<_>) = batches
            .into_iter()
            .map(|batch| {
                let size = batch.len();
                let dispatcher = self.clone();
                let handle = tokio::spawn(async move { dispatcher.process_batch(batch).await });
                (size, handle)
            })
            .unzip();

        let results = join_all(handles).await;

        let mut summaries = Vec::with_capacity(sizes.len());
        for (size, result) in sizes.into_iter().zip(results) {
            match result {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    error!(error = %e, batch_size = size, "Batch task died before settling");
                    summaries.push(BatchSummary::all_failed(size));
                }
            }
        }
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeliveryOutcome, NotificationContent};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Mutex;

    // A fake client that fails the tokens it is told to and records every
    // token it was asked to deliver.
    struct FakePushClient {
        failing_tokens: HashSet<String>,
        seen_tokens: Mutex<Vec<String>>,
    }

    impl FakePushClient {
        fn new(failing_tokens: &[&str]) -> Self {
            Self {
                failing_tokens: failing_tokens.iter().map(|t| t.to_string()).collect(),
                seen_tokens: Mutex::new(Vec::new()),
            }
        }

        fn seen_tokens(&self) -> Vec<String> {
            self.seen_tokens.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PushClient for FakePushClient {
        async fn send(&self, request: &NotificationRequest) -> DeliveryOutcome {
            self.seen_tokens.lock().unwrap().push(request.token.clone());
            if self.failing_tokens.contains(&request.token) {
                DeliveryOutcome::Failed("rejected by fake endpoint".to_string())
            } else {
                DeliveryOutcome::Delivered(json!({"data": {"status": "ok"}}))
            }
        }
    }

    // A client that panics on a specific token, to exercise the policy for
    // batch tasks that die before settling.
    struct PanickingPushClient {
        panic_token: String,
    }

    #[async_trait]
    impl PushClient for PanickingPushClient {
        async fn send(&self, request: &NotificationRequest) -> DeliveryOutcome {
            if request.token == self.panic_token {
                panic!("fake client panic for {}", request.token);
            }
            DeliveryOutcome::Delivered(json!(null))
        }
    }

    fn request(token: &str) -> NotificationRequest {
        NotificationRequest {
            token: token.to_string(),
            notification_data: NotificationContent::default(),
        }
    }

    #[tokio::test]
    async fn test_batch_counts_sum_to_batch_size() {
        let client = Arc::new(FakePushClient::new(&["bad-1", "bad-2"]));
        let dispatcher = Dispatcher::new(client);

        let batch = vec![
            request("good-1"),
            request("bad-1"),
            request("good-2"),
            request("bad-2"),
            request("good-3"),
        ];
        let summary = dispatcher.process_batch(batch).await;

        assert_eq!(summary.successes, 3);
        assert_eq!(summary.failures, 2);
        assert_eq!(summary.successes + summary.failures, 5);
    }

    #[tokio::test]
    async fn test_failing_request_does_not_abort_siblings() {
        let client = Arc::new(FakePushClient::new(&["bad"]));
        let dispatcher = Dispatcher::new(client.clone());

        let summary = dispatcher
            .process_batch(vec![request("a"), request("bad"), request("b")])
            .await;

        // Every sibling was still attempted and counted.
        let mut seen = client.seen_tokens();
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "bad"]);
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.failures, 1);
    }

    #[tokio::test]
    async fn test_empty_batch_settles_to_zero_counts() {
        let client = Arc::new(FakePushClient::new(&[]));
        let dispatcher = Dispatcher::new(client);

        let summary = dispatcher.process_batch(Vec::new()).await;

        assert_eq!(summary, BatchSummary::default());
    }

    #[tokio::test]
    async fn test_dispatch_all_preserves_batch_order() {
        let client = Arc::new(FakePushClient::new(&["bad"]));
        let dispatcher = Dispatcher::new(client);

        let summaries = dispatcher
            .dispatch_all(vec![
                vec![request("a"), request("b")],
                vec![request("bad")],
                vec![],
            ])
            .await;

        assert_eq!(
            summaries,
            vec![
                BatchSummary { successes: 2, failures: 0 },
                BatchSummary { successes: 0, failures: 1 },
                BatchSummary::default(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_batch_does_not_block_other_batches() {
        let client = Arc::new(FakePushClient::new(&["bad-1", "bad-2"]));
        let dispatcher = Dispatcher::new(client);

        let summaries = dispatcher
            .dispatch_all(vec![
                vec![request("bad-1"), request("bad-2")],
                vec![request("good")],
            ])
            .await;

        assert_eq!(summaries[0], BatchSummary { successes: 0, failures: 2 });
        assert_eq!(summaries[1], BatchSummary { successes: 1, failures: 0 });
    }

    #[tokio::test]
    async fn test_panicked_batch_counts_as_all_failures() {
        let client = Arc::new(PanickingPushClient {
            panic_token: "poison".to_string(),
        });
        let dispatcher = Dispatcher::new(client);

        let summaries = dispatcher
            .dispatch_all(vec![
                vec![request("poison"), request("a"), request("b")],
                vec![request("c")],
            ])
            .await;

        // The dead batch contributes its full size as failures; its sibling
        // batch settles normally.
        assert_eq!(summaries[0], BatchSummary::all_failed(3));
        assert_eq!(summaries[1], BatchSummary { successes: 1, failures: 0 });
    }
}
