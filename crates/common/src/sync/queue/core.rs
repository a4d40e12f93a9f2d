use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use super::errors::QueueResult;
use super::metrics::{QueueMetrics, QueueMetricsSnapshot};
use super::types::{Priority, QueueConfig};

/// Bounded-concurrency admission queue
///
/// Every unit of work passes through [`RequestQueue::submit`]. While fewer
/// than `max_concurrent` units are running a new unit starts immediately;
/// otherwise it waits until a running unit finishes. Waiters are admitted by
/// priority, then FIFO by submission sequence.
///
/// Units never affect each other: a failing unit only releases its slot, and
/// a caller that drops its pending `submit` future gives up its place (or its
/// slot, if it was already admitted).
///
/// Clones share the same admission state.
///
/// # Examples
///
/// ```rust
/// use authwire_common::sync::{Priority, QueueConfig, RequestQueue};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = RequestQueue::with_config(QueueConfig::new(2))?;
///
/// let value = queue
///     .submit(Priority::Normal, || async { Ok::<_, std::io::Error>("done") })
///     .await?;
/// assert_eq!(value, "done");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RequestQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    config: QueueConfig,
    state: Mutex<AdmissionState>,
    metrics: QueueMetrics,
}

struct AdmissionState {
    available: usize,
    waiters: BinaryHeap<Waiter>,
    sequence_counter: u64,
}

struct Waiter {
    priority: Priority,
    sequence: u64,
    grant: oneshot::Sender<Permit>,
}

impl PartialEq for Waiter {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl Eq for Waiter {}

impl PartialOrd for Waiter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Waiter {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher priority (lower discriminant) first, then older first
        other.priority.cmp(&self.priority).then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A held concurrency slot; dropping it admits the next waiter.
struct Permit {
    queue: Option<Arc<QueueInner>>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.take() {
            queue.release();
        }
    }
}

impl QueueInner {
    /// Hand the slot to the best live waiter, or return it to the pool.
    fn release(self: &Arc<Self>) {
        loop {
            let waiter = {
                let mut state = self.state.lock();
                match state.waiters.pop() {
                    Some(waiter) => waiter,
                    None => {
                        state.available += 1;
                        return;
                    }
                }
            };

            let permit = Permit { queue: Some(Arc::clone(self)) };
            match waiter.grant.send(permit) {
                Ok(()) => {
                    trace!(sequence = waiter.sequence, priority = %waiter.priority, "Slot handed over");
                    return;
                }
                // The waiter gave up; disarm and try the next one.
                Err(mut unclaimed) => {
                    unclaimed.queue = None;
                }
            }
        }
    }
}

impl RequestQueue {
    /// Create a queue with the given configuration
    ///
    /// # Errors
    /// Returns `QueueError::InvalidConfig` when `max_concurrent` is zero.
    pub fn with_config(config: QueueConfig) -> QueueResult<Self> {
        config.validate()?;

        let state = AdmissionState {
            available: config.max_concurrent,
            waiters: BinaryHeap::new(),
            sequence_counter: 0,
        };

        Ok(Self {
            inner: Arc::new(QueueInner {
                config,
                state: Mutex::new(state),
                metrics: QueueMetrics::new(),
            }),
        })
    }

    /// Run `operation` once a concurrency slot is available
    ///
    /// The outcome of the operation is returned unchanged; the queue itself
    /// never fails a submission.
    pub async fn submit<F, Fut, T, E>(&self, priority: Priority, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.inner.metrics.record_submit();
        let _permit = self.acquire(priority).await;
        self.inner.metrics.record_admit();

        let outcome = operation().await;
        match &outcome {
            Ok(_) => self.inner.metrics.record_completion(),
            Err(_) => self.inner.metrics.record_failure(),
        }
        outcome
    }

    async fn acquire(&self, priority: Priority) -> Permit {
        loop {
            let receiver = {
                let mut state = self.inner.state.lock();
                if state.available > 0 {
                    state.available -= 1;
                    return Permit { queue: Some(Arc::clone(&self.inner)) };
                }

                let (grant, receiver) = oneshot::channel();
                let sequence = state.sequence_counter;
                state.sequence_counter += 1;
                state.waiters.push(Waiter { priority, sequence, grant });
                debug!(sequence, %priority, waiting = state.waiters.len(), "Request queued");
                receiver
            };

            if let Ok(permit) = receiver.await {
                return permit;
            }
        }
    }

    /// Number of units currently holding a slot
    pub fn in_flight(&self) -> usize {
        let state = self.inner.state.lock();
        self.inner.config.max_concurrent.saturating_sub(state.available)
    }

    /// Number of units waiting for a slot
    pub fn waiting(&self) -> usize {
        self.inner.state.lock().waiters.len()
    }

    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    pub fn metrics(&self) -> QueueMetricsSnapshot {
        self.inner.metrics.snapshot(
            self.in_flight(),
            self.waiting(),
            self.inner.config.max_concurrent,
        )
    }
}

impl fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestQueue")
            .field("max_concurrent", &self.inner.config.max_concurrent)
            .field("in_flight", &self.in_flight())
            .field("waiting", &self.waiting())
            .finish()
    }
}
