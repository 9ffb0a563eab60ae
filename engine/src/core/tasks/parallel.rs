use std::{
    fmt,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use crossbeam::channel::{Receiver, bounded};
use log::{debug, warn};

/// A cooperative cancellation flag shared between a task's owner and its running work.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    /// Ask the work to stop. The work decides when, or whether, to look.
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Determine if cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The state of a run as seen by [`ParallelTask::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll<T> {
    Pending,
    Done(T),
}

/// Error type for background task misuse and failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// `execute` was called while the previous run had not been collected.
    InProgress,
    /// The result was requested but the task was never executed, or was already collected.
    NotStarted,
    /// The work panicked before producing a result.
    Panicked,
    /// The worker thread could not be spawned.
    Spawn(String),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::InProgress => write!(f, "task is already in progress"),
            TaskError::NotStarted => write!(f, "task has no run to collect"),
            TaskError::Panicked => write!(f, "task panicked before completing"),
            TaskError::Spawn(reason) => write!(f, "failed to spawn task thread: {reason}"),
        }
    }
}

impl std::error::Error for TaskError {}

type Work<T> = Arc<dyn Fn(&Cancellation) -> T + Send + Sync>;

struct Run<T> {
    handle: JoinHandle<()>,
    result: Receiver<T>,
    cancel: Cancellation,
}

impl<T> Run<T> {
    /// Join the worker and take its result.
    fn finish(self) -> Result<T, TaskError> {
        let joined = self.handle.join();
        match (joined, self.result.try_recv()) {
            (Ok(()), Ok(result)) => Ok(result),
            _ => Err(TaskError::Panicked),
        }
    }
}

/// A unit of work run on its own thread, away from the update loop.
///
/// The owner calls [`execute`](ParallelTask::execute) to start a run, checks
/// [`is_completed`](ParallelTask::is_completed) or [`poll`](ParallelTask::poll) from its loop, and
/// collects the result with `poll` or [`join`](ParallelTask::join). The worker publishes the result
/// and then sets the completion flag as its very last step, so once the flag reads true the result
/// is ready.
///
/// Only one run may be outstanding at a time; starting another before the last result has been
/// collected is an error. Dropping the task cancels and joins any outstanding run.
///
/// # Example
///
/// ```rust
/// use rusty_substrate::core::tasks::ParallelTask;
///
/// let mut task = ParallelTask::new(|_cancel| (1..=10).sum::<u32>());
/// task.execute().unwrap();
/// assert_eq!(task.join(), Ok(55));
/// assert!(task.is_completed());
/// ```
pub struct ParallelTask<T: Send + 'static> {
    name: String,
    work: Work<T>,
    completed: Arc<Mutex<bool>>,
    run: Option<Run<T>>,
}

impl<T: Send + 'static> ParallelTask<T> {
    /// Construct a task around `work`. Nothing runs until [`execute`](ParallelTask::execute).
    pub fn new<F>(work: F) -> Self
    where
        F: Fn(&Cancellation) -> T + Send + Sync + 'static,
    {
        Self::named("parallel-task", work)
    }

    /// Construct a task whose worker threads carry `name`.
    pub fn named<F>(name: impl Into<String>, work: F) -> Self
    where
        F: Fn(&Cancellation) -> T + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            work: Arc::new(work),
            completed: Arc::new(Mutex::new(false)),
            run: None,
        }
    }

    /// Start a run on a new thread. The completion flag is reset before the thread starts.
    pub fn execute(&mut self) -> Result<(), TaskError> {
        if self.run.is_some() {
            return Err(TaskError::InProgress);
        }
        *self.completed.lock().unwrap() = false;

        let (sender, result) = bounded(1);
        let cancel = Cancellation::default();
        let work = Arc::clone(&self.work);
        let completed = Arc::clone(&self.completed);
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || {
                let _ = sender.send(work(&token));
                *completed.lock().unwrap() = true;
            })
            .map_err(|err| TaskError::Spawn(err.to_string()))?;

        debug!("task {} started", self.name);
        self.run = Some(Run {
            handle,
            result,
            cancel,
        });
        Ok(())
    }

    /// Determine if the most recent run has finished its work. Safe to call while it runs.
    pub fn is_completed(&self) -> bool {
        *self.completed.lock().unwrap()
    }

    /// Determine if a run is outstanding and has not finished.
    pub fn is_running(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|run| !run.handle.is_finished())
    }

    /// Check on the outstanding run without blocking, taking the result if it is done.
    pub fn poll(&mut self) -> Result<Poll<T>, TaskError> {
        let Some(run) = self.run.take() else {
            return Err(TaskError::NotStarted);
        };
        // Read `finished` first: a thread that has ended can no longer set the flag.
        let finished = run.handle.is_finished();
        if self.is_completed() || finished {
            return self.collect(run).map(Poll::Done);
        }
        self.run = Some(run);
        Ok(Poll::Pending)
    }

    /// Block until the outstanding run finishes and take its result.
    pub fn join(&mut self) -> Result<T, TaskError> {
        let run = self.run.take().ok_or(TaskError::NotStarted)?;
        self.collect(run)
    }

    /// Request cancellation of the outstanding run. Returns false if there is none.
    pub fn cancel(&self) -> bool {
        match &self.run {
            Some(run) => {
                run.cancel.cancel();
                true
            }
            None => false,
        }
    }

    fn collect(&self, run: Run<T>) -> Result<T, TaskError> {
        let result = run.finish();
        if result.is_err() {
            warn!("task {} panicked", self.name);
        }
        result
    }
}

impl<T: Send + 'static> Drop for ParallelTask<T> {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
            let _ = run.handle.join();
        }
    }
}

impl<T: Send + 'static> fmt::Debug for ParallelTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallelTask")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .field("completed", &self.is_completed())
            .finish()
    }
}
