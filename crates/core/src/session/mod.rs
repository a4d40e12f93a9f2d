//! Session state shared by every in-flight request

mod state;

pub use state::{SessionState, CONNECTION_EVENT_CAPACITY};
