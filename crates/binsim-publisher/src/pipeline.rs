//! The bounded-concurrency publish pipeline.
//!
//! [`PublishPipeline::publish_batch`] fans a bounded collection of records
//! out to the broker through a task group capped by a semaphore, waits for
//! per-record acknowledgement with a timeout, and aggregates the outcome.
//! Failures are bulkhead-isolated: one record timing out or failing to
//! serialize never aborts its siblings, and the pipeline never retries --
//! retrying the failed subset is the caller's decision.
//!
//! Ordering: the semaphore admits tasks in spawn order, so dispatch begins
//! in record order, but completions across workers interleave freely.
//! Downstream consumers must not assume publish order reflects generation
//! order.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::broker::Publisher;
use crate::error::PublishError;

/// Tunables for one publish batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum records in flight at once (effective pool size is
    /// `min(concurrency_limit, records.len())`, at least 1).
    pub concurrency_limit: usize,
    /// How long to wait for a single record's acknowledgement.
    pub per_record_timeout: Duration,
    /// Fixed delay after each dispatch within a worker, to avoid
    /// overwhelming the broker. Zero disables throttling.
    pub throttle: Duration,
    /// Batch-level cancellation: stops dispatching new records, lets
    /// in-flight publishes finish or time out.
    pub cancel: CancellationToken,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency_limit: 4,
            per_record_timeout: Duration::from_secs(5),
            throttle: Duration::from_millis(10),
            cancel: CancellationToken::new(),
        }
    }
}

/// A record that could not be published, with its cause.
#[derive(Debug)]
pub struct FailedRecord<T> {
    /// The record that failed.
    pub record: T,
    /// Why it failed.
    pub error: PublishError,
}

/// Aggregate outcome of a publish batch.
#[derive(Debug)]
pub struct BatchResult<T> {
    /// Number of records acknowledged by the broker.
    pub succeeded: usize,
    /// Records that failed, each with its cause. Order is arbitrary.
    pub failed: Vec<FailedRecord<T>>,
}

impl<T> BatchResult<T> {
    /// Total records accounted for.
    pub fn total(&self) -> usize {
        self.succeeded.saturating_add(self.failed.len())
    }

    /// Whether every record in the batch was acknowledged.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self {
            succeeded: 0,
            failed: Vec::new(),
        }
    }
}

/// Fans records out to a shared [`Publisher`] with bounded parallelism.
#[derive(Debug, Clone)]
pub struct PublishPipeline<P> {
    publisher: Arc<P>,
}

impl<P> PublishPipeline<P>
where
    P: Publisher + 'static,
{
    /// Create a pipeline over a shared publisher.
    pub const fn new(publisher: Arc<P>) -> Self {
        Self { publisher }
    }

    /// Publish a bounded collection of records to one subject.
    ///
    /// Each record is serialized to JSON and dispatched through a worker
    /// pool sized `min(concurrency_limit, records.len())`. A record's
    /// failure (serialization, transport, timeout, cancellation) is
    /// captured in the result and does not affect sibling records.
    pub async fn publish_batch<T>(
        &self,
        subject: &str,
        records: Vec<T>,
        options: &BatchOptions,
    ) -> BatchResult<T>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let total = records.len();
        if total == 0 {
            debug!(subject = subject, "empty batch, nothing to publish");
            return BatchResult::default();
        }

        let workers = options.concurrency_limit.clamp(1, total);
        let semaphore = Arc::new(Semaphore::new(workers));
        info!(subject = subject, records = total, workers, "starting publish batch");

        let mut tasks: JoinSet<Result<(), FailedRecord<T>>> = JoinSet::new();
        for record in records {
            let publisher = Arc::clone(&self.publisher);
            let semaphore = Arc::clone(&semaphore);
            let cancel = options.cancel.clone();
            let subject = subject.to_owned();
            let timeout = options.per_record_timeout;
            let throttle = options.throttle;

            tasks.spawn(async move {
                // A closed semaphore is unreachable here; treat it like
                // cancellation rather than panicking.
                let Ok(_permit) = semaphore.acquire().await else {
                    return Err(FailedRecord {
                        record,
                        error: PublishError::Cancelled { subject },
                    });
                };

                // Check only after holding a permit: records already in
                // flight when the batch is cancelled run to completion.
                if cancel.is_cancelled() {
                    return Err(FailedRecord {
                        record,
                        error: PublishError::Cancelled { subject },
                    });
                }

                let result = publish_one(&*publisher, &subject, &record, timeout).await;
                if !throttle.is_zero() {
                    tokio::time::sleep(throttle).await;
                }
                result.map_err(|error| FailedRecord { record, error })
            });
        }

        let mut result = BatchResult::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => result.succeeded = result.succeeded.saturating_add(1),
                Ok(Err(failed)) => result.failed.push(failed),
                Err(join_error) => {
                    // Task panicked or was aborted; the record is gone, so
                    // it cannot appear in `failed`. Should not happen.
                    warn!(subject = subject, error = %join_error, "publish task failed to join");
                }
            }
        }

        info!(
            subject = subject,
            succeeded = result.succeeded,
            failed = result.failed.len(),
            "publish batch finished"
        );
        result
    }

    /// Publish a single record: same contract as [`Self::publish_batch`]
    /// with a concurrency of 1. Used for singleton entities such as the
    /// suburb record.
    pub async fn publish_single<T>(
        &self,
        subject: &str,
        record: T,
        options: &BatchOptions,
    ) -> BatchResult<T>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let options = BatchOptions {
            concurrency_limit: 1,
            ..options.clone()
        };
        self.publish_batch(subject, vec![record], &options).await
    }
}

/// Serialize and publish one record, bounding the acknowledgement wait.
async fn publish_one<P, T>(
    publisher: &P,
    subject: &str,
    record: &T,
    timeout: Duration,
) -> Result<(), PublishError>
where
    P: Publisher + ?Sized,
    T: Serialize,
{
    let payload = serde_json::to_vec(record).map_err(|source| PublishError::Serialization {
        subject: subject.to_owned(),
        source,
    })?;

    match tokio::time::timeout(timeout, publisher.publish(subject, payload)).await {
        Ok(outcome) => outcome,
        Err(_elapsed) => Err(PublishError::Timeout {
            subject: subject.to_owned(),
            timeout_ms: timeout.as_millis(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde::Serialize;

    use super::*;

    #[derive(Debug, Clone, Serialize, PartialEq)]
    struct Record {
        n: usize,
    }

    /// Scriptable in-memory publisher.
    ///
    /// Hangs forever on records whose serialized payload matches
    /// `hang_on`, rejects payloads matching `reject_on`, and cancels the
    /// given token after `cancel_after` accepted publishes.
    #[derive(Default)]
    struct ScriptedPublisher {
        published: Mutex<Vec<String>>,
        accepted: AtomicUsize,
        hang_on: Option<String>,
        reject_on: Option<String>,
        cancel_after: Option<(usize, CancellationToken)>,
    }

    impl ScriptedPublisher {
        fn published(&self) -> Vec<String> {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Publisher for ScriptedPublisher {
        async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), PublishError> {
            let text = String::from_utf8(payload).unwrap();

            if self.hang_on.as_deref() == Some(text.as_str()) {
                futures::future::pending::<()>().await;
            }
            if self.reject_on.as_deref() == Some(text.as_str()) {
                return Err(PublishError::Transport {
                    subject: subject.to_owned(),
                    message: "broker said no".to_owned(),
                });
            }

            self.published.lock().unwrap().push(text);
            let accepted = self.accepted.fetch_add(1, Ordering::SeqCst).saturating_add(1);
            if let Some((after, token)) = &self.cancel_after {
                if accepted >= *after {
                    token.cancel();
                }
            }
            Ok(())
        }
    }

    fn records(count: usize) -> Vec<Record> {
        (0..count).map(|n| Record { n }).collect()
    }

    fn fast_options() -> BatchOptions {
        BatchOptions {
            concurrency_limit: 5,
            per_record_timeout: Duration::from_millis(100),
            throttle: Duration::ZERO,
            cancel: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn full_batch_succeeds() {
        let publisher = Arc::new(ScriptedPublisher::default());
        let pipeline = PublishPipeline::new(Arc::clone(&publisher));

        let result = pipeline
            .publish_batch("t.test", records(10), &fast_options())
            .await;

        assert_eq!(result.succeeded, 10);
        assert!(result.is_complete());
        assert_eq!(publisher.published().len(), 10);
    }

    #[tokio::test]
    async fn one_timeout_fails_exactly_that_record() {
        let publisher = Arc::new(ScriptedPublisher {
            hang_on: Some(r#"{"n":3}"#.to_owned()),
            ..ScriptedPublisher::default()
        });
        let pipeline = PublishPipeline::new(Arc::clone(&publisher));

        let result = pipeline
            .publish_batch("t.test", records(10), &fast_options())
            .await;

        assert_eq!(result.succeeded, 9);
        assert_eq!(result.failed.len(), 1);
        let failure = result.failed.first().unwrap();
        assert_eq!(failure.record, Record { n: 3 });
        assert!(matches!(failure.error, PublishError::Timeout { .. }));
    }

    #[tokio::test]
    async fn transport_failure_is_isolated_per_record() {
        let publisher = Arc::new(ScriptedPublisher {
            reject_on: Some(r#"{"n":0}"#.to_owned()),
            ..ScriptedPublisher::default()
        });
        let pipeline = PublishPipeline::new(Arc::clone(&publisher));

        let result = pipeline
            .publish_batch("t.test", records(4), &fast_options())
            .await;

        assert_eq!(result.succeeded, 3);
        assert_eq!(result.failed.len(), 1);
        assert!(matches!(
            result.failed.first().unwrap().error,
            PublishError::Transport { .. }
        ));
    }

    #[tokio::test]
    async fn unserializable_record_is_reported_not_fatal() {
        #[derive(Debug, Serialize)]
        struct Sometimes {
            value: f64,
        }

        let publisher = Arc::new(ScriptedPublisher::default());
        let pipeline = PublishPipeline::new(Arc::clone(&publisher));

        // JSON has no representation for NaN; serialization must fail.
        let batch = vec![Sometimes { value: 1.0 }, Sometimes { value: f64::NAN }];
        let result = pipeline.publish_batch("t.test", batch, &fast_options()).await;

        assert_eq!(result.succeeded, 1);
        assert_eq!(result.failed.len(), 1);
        assert!(matches!(
            result.failed.first().unwrap().error,
            PublishError::Serialization { .. }
        ));
    }

    #[tokio::test]
    async fn cancellation_stops_new_dispatches() {
        let cancel = CancellationToken::new();
        let publisher = Arc::new(ScriptedPublisher {
            cancel_after: Some((2, cancel.clone())),
            ..ScriptedPublisher::default()
        });
        let pipeline = PublishPipeline::new(Arc::clone(&publisher));

        let options = BatchOptions {
            concurrency_limit: 1, // serial, so the cutoff is deterministic
            cancel,
            ..fast_options()
        };
        let result = pipeline.publish_batch("t.test", records(5), &options).await;

        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed.len(), 3);
        assert!(result
            .failed
            .iter()
            .all(|f| matches!(f.error, PublishError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn single_publish_uses_the_same_contract() {
        let publisher = Arc::new(ScriptedPublisher::default());
        let pipeline = PublishPipeline::new(Arc::clone(&publisher));

        let result = pipeline
            .publish_single("t.test.suburb", Record { n: 7 }, &fast_options())
            .await;

        assert_eq!(result.succeeded, 1);
        assert_eq!(publisher.published(), vec![r#"{"n":7}"#.to_owned()]);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let publisher = Arc::new(ScriptedPublisher::default());
        let pipeline = PublishPipeline::new(Arc::clone(&publisher));

        let result = pipeline
            .publish_batch("t.test", Vec::<Record>::new(), &fast_options())
            .await;

        assert_eq!(result.total(), 0);
        assert!(result.is_complete());
    }
}
