//! Producer, consumer and reader threads that drive a pool.
//!
//! Each worker is a named OS thread looping until its [`CancelToken`] fires.
//! The same token interrupts the worker's sleeps and any `take` it is blocked
//! in, so stopping a worker never waits for a ticket to arrive.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::{BoundedPool, CancelToken, PoolError, Ticket};

/// What a worker does on each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerRole {
    /// Adds `Ticket-<id>-<n>` tickets.
    Producer,
    /// Takes tickets, blocking while the pool is empty.
    Consumer,
    /// Observes size and the head ticket.
    Reader,
}

impl WorkerRole {
    /// Capitalized label used in operator messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Producer => "Producer",
            Self::Consumer => "Consumer",
            Self::Reader => "Reader",
        }
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Producer => f.write_str("producer"),
            Self::Consumer => f.write_str("consumer"),
            Self::Reader => f.write_str("reader"),
        }
    }
}

/// Per-worker activity counters (lock-free atomics).
#[derive(Debug, Default)]
pub(crate) struct WorkerCounters {
    produced: AtomicU64,
    rejected: AtomicU64,
    consumed: AtomicU64,
    reads: AtomicU64,
}

impl WorkerCounters {
    fn snapshot(&self) -> WorkerStats {
        WorkerStats {
            produced: self.produced.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            consumed: self.consumed.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of a worker's activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Tickets admitted by a producer.
    pub produced: u64,
    /// Adds rejected because the pool was full.
    pub rejected: u64,
    /// Tickets taken by a consumer.
    pub consumed: u64,
    /// Observations made by a reader.
    pub reads: u64,
}

/// Timing knobs shared by every worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Pause between iterations.
    pub delay: Duration,
    /// Producers pause `delay * backoff_factor` after a rejected add.
    pub backoff_factor: u32,
}

impl WorkerSettings {
    /// Settings with the given delay and the default backoff factor of 2.
    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            backoff_factor: 2,
        }
    }
}

/// A running worker thread.
///
/// Dropping the handle stops the worker without joining it; call
/// [`WorkerHandle::stop_and_join`] to wait for the thread to exit.
pub struct WorkerHandle {
    id: String,
    role: WorkerRole,
    stop: CancelToken,
    counters: Arc<WorkerCounters>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawn a worker of `role` against `pool`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(
        role: WorkerRole,
        id: impl Into<String>,
        pool: Arc<dyn BoundedPool>,
        settings: WorkerSettings,
    ) -> std::io::Result<Self> {
        let id = id.into();
        let stop = CancelToken::new();
        let counters = Arc::new(WorkerCounters::default());

        let thread = {
            let id = id.clone();
            let stop = stop.clone();
            let counters = Arc::clone(&counters);
            thread::Builder::new()
                .name(format!("{role}-{id}"))
                .spawn(move || {
                    debug!(worker = %id, role = %role, "worker thread started");
                    match role {
                        WorkerRole::Producer => run_producer(&id, &*pool, settings, &stop, &counters),
                        WorkerRole::Consumer => run_consumer(&id, &*pool, settings, &stop, &counters),
                        WorkerRole::Reader => run_reader(&id, &*pool, settings, &stop, &counters),
                    }
                    debug!(worker = %id, role = %role, "worker thread exiting");
                })?
        };

        Ok(Self {
            id,
            role,
            stop,
            counters,
            thread: Some(thread),
        })
    }

    /// Worker identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Worker role.
    #[must_use]
    pub const fn role(&self) -> WorkerRole {
        self.role
    }

    /// Current activity counters.
    #[must_use]
    pub fn stats(&self) -> WorkerStats {
        self.counters.snapshot()
    }

    /// Ask the worker to stop. Interrupts a blocked `take` and any sleep.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// Whether the thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the worker and wait for its thread to exit. Returns final stats.
    pub fn stop_and_join(mut self) -> WorkerStats {
        self.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!(worker = %self.id, role = %self.role, "worker thread panicked");
            }
        }
        self.stats()
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

impl fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

fn run_producer(
    id: &str,
    pool: &dyn BoundedPool,
    settings: WorkerSettings,
    stop: &CancelToken,
    counters: &WorkerCounters,
) {
    let mut sequence: u64 = 0;
    while !stop.is_cancelled() {
        let ticket = Ticket::new(format!("Ticket-{id}-{sequence}"));
        if pool.add(ticket.clone()) {
            info!(worker = %id, ticket = %ticket, "produced");
            sequence += 1;
            counters.produced.fetch_add(1, Ordering::Relaxed);
            let _ = stop.sleep(settings.delay);
        } else {
            debug!(worker = %id, "pool full, waiting before retry");
            counters.rejected.fetch_add(1, Ordering::Relaxed);
            let _ = stop.sleep(settings.delay.saturating_mul(settings.backoff_factor));
        }
    }
}

fn run_consumer(
    id: &str,
    pool: &dyn BoundedPool,
    settings: WorkerSettings,
    stop: &CancelToken,
    counters: &WorkerCounters,
) {
    while !stop.is_cancelled() {
        match pool.take_cancellable(stop) {
            Ok(ticket) => {
                info!(worker = %id, ticket = %ticket, "purchased");
                counters.consumed.fetch_add(1, Ordering::Relaxed);
                let _ = stop.sleep(settings.delay);
            }
            Err(PoolError::Interrupted) => break,
            Err(err) => {
                warn!(worker = %id, error = %err, "consumer stopping");
                break;
            }
        }
    }
}

fn run_reader(
    id: &str,
    pool: &dyn BoundedPool,
    settings: WorkerSettings,
    stop: &CancelToken,
    counters: &WorkerCounters,
) {
    while !stop.is_cancelled() {
        let available = pool.size();
        info!(worker = %id, available, "read");
        if available > 0 {
            if let Some(head) = pool.peek(0) {
                debug!(worker = %id, ticket = %head, "peeked at first ticket");
            }
        }
        counters.reads.fetch_add(1, Ordering::Relaxed);
        let _ = stop.sleep(settings.delay);
    }
}
