//! Single-flight execution
//!
//! Concurrent callers of [`SingleFlight::run`] share one in-flight future:
//! the first caller starts the operation, later callers await the same
//! result. Once it settles the slot is cleared so the next call starts fresh.
//!
//! A panicking operation settles the flight like any other failure: every
//! joined caller receives `E::from(FlightPanicked)` and the slot is freed.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, trace};

/// The shared operation panicked before producing a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("In-flight operation panicked: {0}")]
pub struct FlightPanicked(pub String);

impl FlightPanicked {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self(message)
    }
}

impl From<FlightPanicked> for String {
    fn from(panicked: FlightPanicked) -> Self {
        panicked.to_string()
    }
}

type SharedResult<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Fixed slot holding at most one in-flight operation
pub struct SingleFlight<T, E>
where
    T: Clone,
    E: Clone,
{
    slot: Mutex<Option<SharedResult<T, E>>>,
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<FlightPanicked> + 'static,
{
    pub fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    /// Join the in-flight operation, or start one with `make`
    ///
    /// `make` is only invoked when nothing is in flight. Every caller joined
    /// to the same flight receives a clone of the same result.
    pub async fn run<F, Fut>(&self, make: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let flight = {
            let mut slot = self.slot.lock();
            match slot.as_ref() {
                Some(existing) => {
                    trace!("Joining in-flight operation");
                    existing.clone()
                }
                None => {
                    let flight = AssertUnwindSafe(make())
                        .catch_unwind()
                        .map(|settled| {
                            settled.unwrap_or_else(|payload| {
                                let panicked = FlightPanicked::from_payload(payload.as_ref());
                                error!(error = %panicked, "Single-flight operation panicked");
                                Err(E::from(panicked))
                            })
                        })
                        .boxed()
                        .shared();
                    *slot = Some(flight.clone());
                    flight
                }
            }
        };

        let outcome = flight.clone().await;

        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|current| Shared::ptr_eq(current, &flight)) {
            *slot = None;
        }
        outcome
    }

    pub fn is_in_flight(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<T, E> Default for SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<FlightPanicked> + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, E: Clone> fmt::Debug for SingleFlight<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleFlight").field("in_flight", &self.slot.lock().is_some()).finish()
    }
}
