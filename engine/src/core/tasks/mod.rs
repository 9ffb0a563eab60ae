//! Work that runs off the update loop.
//!
//! [`ParallelTask`] runs one unit of work on its own thread and hands the result back through a
//! polled completion flag, a non-blocking [`poll`](ParallelTask::poll) or a blocking
//! [`join`](ParallelTask::join). The work receives a [`Cancellation`] token it may check to stop
//! early.

mod parallel;

pub use parallel::{Cancellation, ParallelTask, Poll, TaskError};
