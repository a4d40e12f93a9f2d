//! Integration tests for the request queue and single-flight primitives
//!
//! Exercises the queue the way the dispatcher does: many concurrent
//! submissions, some failing, with retries re-entering through `submit`.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use authwire_common::sync::{Priority, QueueConfig, QueueResult, RequestQueue, SingleFlight};

/// A failing unit never blocks the units queued behind it.
#[tokio::test(flavor = "multi_thread")]
async fn test_failures_are_isolated() -> QueueResult<()> {
    let queue = RequestQueue::with_config(QueueConfig::new(1))?;

    let mut handles = vec![];
    for idx in 0..6_u32 {
        let queue = queue.clone();
        handles.push(tokio::spawn(async move {
            queue
                .submit(Priority::Normal, || async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    if idx % 2 == 0 {
                        Err(format!("unit {idx} failed"))
                    } else {
                        Ok(idx)
                    }
                })
                .await
        }));
    }

    let mut ok = 0;
    let mut failed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(_) => failed += 1,
        }
    }

    assert_eq!(ok, 3);
    assert_eq!(failed, 3);

    let metrics = queue.metrics();
    assert_eq!(metrics.total_submitted, 6);
    assert_eq!(metrics.total_completed, 3);
    assert_eq!(metrics.total_failed, 3);
    assert_eq!(metrics.in_flight, 0);
    assert_eq!(metrics.waiting, 0);
    Ok(())
}

/// A unit may re-submit itself (a retry) after its first attempt returns.
#[tokio::test(flavor = "multi_thread")]
async fn test_resubmission_after_release_completes() -> QueueResult<()> {
    let queue = RequestQueue::with_config(QueueConfig::new(2))?;
    let attempts = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for _ in 0..4 {
        let queue = queue.clone();
        let attempts = Arc::clone(&attempts);
        handles.push(tokio::spawn(async move {
            let first = queue
                .submit(Priority::Normal, || {
                    let attempts = Arc::clone(&attempts);
                    async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        Err::<(), _>("rejected")
                    }
                })
                .await;
            assert!(first.is_err());

            queue
                .submit(Priority::Normal, || {
                    let attempts = Arc::clone(&attempts);
                    async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, &str>(())
                    }
                })
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 8);
    assert_eq!(queue.in_flight(), 0);
    Ok(())
}

/// Queued callers waiting on a shared flight do not hold queue slots.
#[tokio::test(flavor = "multi_thread")]
async fn test_single_flight_outside_queue_slots() -> QueueResult<()> {
    let queue = RequestQueue::with_config(QueueConfig::new(2))?;
    let flight = Arc::new(SingleFlight::<u32, String>::new());
    let executions = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for _ in 0..8 {
        let queue = queue.clone();
        let flight = Arc::clone(&flight);
        let executions = Arc::clone(&executions);
        handles.push(tokio::spawn(async move {
            let rejected: Result<u32, String> =
                queue.submit(Priority::Normal, || async { Err("stale".to_string()) }).await;
            assert!(rejected.is_err());

            let fresh = flight
                .run(|| async move {
                    executions.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(99)
                })
                .await?;

            queue.submit(Priority::High, || async move { Ok::<_, String>(fresh) }).await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(99));
    }
    assert!(executions.load(Ordering::SeqCst) >= 1);
    assert!(executions.load(Ordering::SeqCst) <= 8);
    assert_eq!(queue.metrics().total_submitted, 16);
    Ok(())
}
