//! Debouncing and sequencing of calls to the external services.
//!
//! - [`debounce::Debouncer`] collapses a burst of calls into one, keeping the last value.
//! - [`sequence::RequestSequence`] tags each dispatch with a [`sequence::RequestTicket`]
//!   and rejects responses that are older than the last one applied.
//! - [`coordinator::RequestCoordinator`] combines both, per operation.
//!
//! Time is passed in explicitly as a [`std::time::Duration`] since an arbitrary epoch, so the
//! caller's event loop (or a test) owns the clock.
pub mod coordinator;
pub mod debounce;
pub mod sequence;

pub use coordinator::{CoordinatorStats, Dispatch, RequestCoordinator};
pub use debounce::Debouncer;
pub use sequence::{RequestSequence, RequestTicket};
