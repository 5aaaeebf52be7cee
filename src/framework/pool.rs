//! # Fixed-Size Worker Pool
//!
//! A bounded set of workers pulling tasks from one shared FIFO queue.
//!
//! ## Lifecycle
//!
//! ```text
//! Accepting --shutdown()--> Draining --await_termination()--> Terminated
//!     |                        |
//!     +----shutdown_now()------+-----------------------------> Terminated
//! ```
//!
//! - **Accepting**: [`WorkerPool::submit`] enqueues tasks. At most `size` of them run at once,
//!   the rest wait in the queue.
//! - **Draining**: submission is closed. Queued tasks still run; workers exit once the queue is empty.
//! - **Terminated**: every worker has exited, either because the queue drained or because
//!   [`WorkerPool::shutdown_now`] forced them out.
//!
//! ## Cancellation
//!
//! Each task receives a child of the pool's [`CancellationToken`]. Cancellation is cooperative:
//! a task is expected to watch its token at every suspension point and return early.
//! `shutdown_now` cancels the token, gives workers a grace period, then aborts whatever is
//! still running.
//!
//! ## Isolation
//!
//! Every task runs in its own Tokio task owned by the worker that picked it up. A panic is
//! logged and counted, and the worker moves on to the next task.

use super::PoolError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type Task = Box<dyn FnOnce(CancellationToken) -> TaskFuture + Send + 'static>;
type TaskQueue = Arc<Mutex<mpsc::UnboundedReceiver<Task>>>;

/// Pool-level lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolState {
    Accepting,
    Draining,
    Terminated,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolState::Accepting => "accepting",
            PoolState::Draining => "draining",
            PoolState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Point-in-time view of the pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Tasks a worker has picked up.
    pub started: usize,
    /// Tasks that returned, panicked or were aborted.
    pub finished: usize,
    /// Tasks that panicked.
    pub panicked: usize,
    /// Tasks running right now.
    pub active: usize,
    /// Highest number of tasks ever running at the same time.
    pub peak_active: usize,
}

#[derive(Debug, Default)]
struct PoolCounters {
    started: AtomicUsize,
    finished: AtomicUsize,
    panicked: AtomicUsize,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

impl PoolCounters {
    fn track(&self) -> ActiveTask<'_> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(active, Ordering::SeqCst);
        ActiveTask(self)
    }

    fn snapshot(&self) -> PoolStats {
        PoolStats {
            started: self.started.load(Ordering::SeqCst),
            finished: self.finished.load(Ordering::SeqCst),
            panicked: self.panicked.load(Ordering::SeqCst),
            active: self.active.load(Ordering::SeqCst),
            peak_active: self.peak_active.load(Ordering::SeqCst),
        }
    }
}

/// Marks a task as active until dropped, including when its worker is aborted.
struct ActiveTask<'a>(&'a PoolCounters);

impl Drop for ActiveTask<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
        self.0.finished.fetch_add(1, Ordering::SeqCst);
    }
}

/// A fixed number of workers executing submitted tasks.
///
/// # Example
///
/// ```
/// use order_processor::framework::WorkerPool;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let mut pool = WorkerPool::new(2).unwrap();
///     for n in 0..4 {
///         pool.submit(move |_cancel| async move {
///             tracing::info!(n, "working");
///         })
///         .unwrap();
///     }
///     pool.shutdown();
///     assert!(pool.await_termination(Duration::from_secs(5)).await);
///     assert_eq!(pool.stats().finished, 4);
/// }
/// ```
pub struct WorkerPool {
    size: usize,
    state: PoolState,
    sender: Option<mpsc::UnboundedSender<Task>>,
    queue: TaskQueue,
    workers: JoinSet<()>,
    cancel: CancellationToken,
    counters: Arc<PoolCounters>,
}

impl WorkerPool {
    /// Starts `size` workers on the current Tokio runtime.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(size: usize) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::InvalidSize);
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let queue: TaskQueue = Arc::new(Mutex::new(receiver));
        let cancel = CancellationToken::new();
        let counters = Arc::new(PoolCounters::default());

        let mut workers = JoinSet::new();
        for worker in 0..size {
            workers.spawn(worker_loop(
                worker,
                queue.clone(),
                cancel.clone(),
                counters.clone(),
            ));
        }
        info!(size, "Worker pool started");

        Ok(Self {
            size,
            state: PoolState::Accepting,
            sender: Some(sender),
            queue,
            workers,
            cancel,
            counters,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn state(&self) -> PoolState {
        self.state
    }

    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }

    /// Enqueues a task. The closure receives the token it must watch for cancellation.
    pub fn submit<F, Fut>(&self, task: F) -> Result<(), PoolError>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let sender = match (&self.sender, self.state) {
            (Some(sender), PoolState::Accepting) => sender,
            _ => return Err(PoolError::Rejected(self.state)),
        };
        let task: Task = Box::new(move |cancel| Box::pin(task(cancel)));
        sender
            .send(task)
            .map_err(|_| PoolError::Rejected(self.state))
    }

    /// Closes submission. Tasks already queued keep running.
    pub fn shutdown(&mut self) {
        if self.state == PoolState::Accepting {
            // Dropping the sender lets idle workers see the end of the queue.
            self.sender = None;
            self.state = PoolState::Draining;
            debug!(workers = self.workers.len(), "Worker pool draining");
        }
    }

    /// Waits up to `timeout` for every worker to exit.
    ///
    /// Returns `true` if the pool terminated in time. Workers only exit after
    /// [`shutdown`](Self::shutdown), so calling this while still accepting always times out.
    pub async fn await_termination(&mut self, timeout: Duration) -> bool {
        if self.state == PoolState::Terminated {
            return true;
        }

        let drained = tokio::time::timeout(timeout, join_workers(&mut self.workers))
            .await
            .is_ok();
        if drained {
            self.state = PoolState::Terminated;
            info!(stats = ?self.stats(), "Worker pool terminated");
        }
        drained
    }

    /// Cancels running tasks and discards queued ones.
    ///
    /// Running tasks get `grace` to observe their token; workers still busy after that are
    /// aborted. Returns the number of queued tasks that never started.
    pub async fn shutdown_now(&mut self, grace: Duration) -> usize {
        self.sender = None;
        self.cancel.cancel();
        warn!(
            active = self.counters.active.load(Ordering::SeqCst),
            "Forcing cancellation of running tasks"
        );

        if tokio::time::timeout(grace, join_workers(&mut self.workers))
            .await
            .is_err()
        {
            warn!(
                remaining = self.workers.len(),
                "Workers ignored cancellation, aborting"
            );
            self.workers.abort_all();
            join_workers(&mut self.workers).await;
        }

        let mut never_started = 0;
        let mut queue = self.queue.lock().await;
        while queue.try_recv().is_ok() {
            never_started += 1;
        }

        self.state = PoolState::Terminated;
        info!(never_started, stats = ?self.stats(), "Worker pool terminated by force");
        never_started
    }
}

async fn join_workers(workers: &mut JoinSet<()>) {
    while let Some(result) = workers.join_next().await {
        if let Err(e) = result {
            if e.is_panic() {
                error!(error = %e, "Worker panicked");
            }
        }
    }
}

async fn next_task(queue: &Mutex<mpsc::UnboundedReceiver<Task>>) -> Option<Task> {
    queue.lock().await.recv().await
}

async fn worker_loop(
    worker: usize,
    queue: TaskQueue,
    cancel: CancellationToken,
    counters: Arc<PoolCounters>,
) {
    debug!(worker, "Worker started");

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = next_task(&queue) => next,
        };
        let Some(task) = next else { break };

        let _active = counters.track();
        // Owning the task in a JoinSet means aborting this worker aborts the task too.
        let mut running = JoinSet::new();
        running.spawn(task(cancel.child_token()));
        if let Some(Err(e)) = running.join_next().await {
            if e.is_panic() {
                counters.panicked.fetch_add(1, Ordering::SeqCst);
                error!(worker, error = %e, "Task panicked");
            }
        }
    }

    debug!(worker, "Worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_workers_rejected() {
        assert_eq!(WorkerPool::new(0).err(), Some(PoolError::InvalidSize));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_never_exceeds_pool_size() {
        let mut pool = WorkerPool::new(3).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let observed_peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..12 {
            let running = running.clone();
            let observed_peak = observed_peak.clone();
            pool.submit(move |_cancel| async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                observed_peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(100)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        pool.shutdown();
        assert!(pool.await_termination(Duration::from_secs(60)).await);

        let stats = pool.stats();
        assert_eq!(observed_peak.load(Ordering::SeqCst), 3);
        assert_eq!(stats.peak_active, 3);
        assert_eq!(stats.started, 12);
        assert_eq!(stats.finished, 12);
        assert_eq!(stats.active, 0);
        assert_eq!(pool.state(), PoolState::Terminated);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_rejected() {
        let mut pool = WorkerPool::new(1).unwrap();
        pool.shutdown();

        let result = pool.submit(|_cancel| async {});
        assert_eq!(result, Err(PoolError::Rejected(PoolState::Draining)));
        assert!(pool.await_termination(Duration::from_secs(1)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_termination_while_accepting_times_out() {
        let mut pool = WorkerPool::new(1).unwrap();
        assert!(!pool.await_termination(Duration::from_secs(1)).await);
        assert_eq!(pool.state(), PoolState::Accepting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_now_cancels_running_and_discards_queued() {
        let mut pool = WorkerPool::new(2).unwrap();
        let cancelled = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let cancelled = cancelled.clone();
            let completed = completed.clone();
            pool.submit(move |cancel| async move {
                tokio::select! {
                    _ = cancel.cancelled() => { cancelled.fetch_add(1, Ordering::SeqCst); }
                    _ = tokio::time::sleep(Duration::from_secs(10)) => { completed.fetch_add(1, Ordering::SeqCst); }
                }
            })
            .unwrap();
        }

        pool.shutdown();
        assert!(!pool.await_termination(Duration::from_secs(1)).await);

        let never_started = pool.shutdown_now(Duration::from_secs(1)).await;
        assert_eq!(never_started, 3);
        assert_eq!(cancelled.load(Ordering::SeqCst), 2);
        assert_eq!(completed.load(Ordering::SeqCst), 0);
        assert_eq!(pool.state(), PoolState::Terminated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_now_aborts_tasks_ignoring_cancellation() {
        let mut pool = WorkerPool::new(1).unwrap();
        pool.submit(|_cancel| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        })
        .unwrap();

        // Let the worker pick the task up.
        tokio::time::sleep(Duration::from_millis(1)).await;

        let never_started = pool.shutdown_now(Duration::from_secs(1)).await;
        assert_eq!(never_started, 0);
        assert_eq!(pool.state(), PoolState::Terminated);
        assert_eq!(pool.stats().active, 0);
    }

    #[tokio::test]
    async fn test_panicking_task_does_not_kill_worker() {
        let mut pool = WorkerPool::new(1).unwrap();
        let completed = Arc::new(AtomicUsize::new(0));

        pool.submit(|_cancel| async { panic!("boom") }).unwrap();
        let counter = completed.clone();
        pool.submit(move |_cancel| async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        pool.shutdown();
        assert!(pool.await_termination(Duration::from_secs(5)).await);

        let stats = pool.stats();
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert_eq!(stats.panicked, 1);
        assert_eq!(stats.finished, 2);
    }
}
