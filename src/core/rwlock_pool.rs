//! Reader/writer lock pool with poll-and-sleep consumption.
//!
//! `size` and `peek` take the shared side and run concurrently with each
//! other; `add` and `take` take the exclusive side. There is no condition
//! variable: an empty `take` drops the lock, sleeps for the poll interval and
//! retries. The extra latency and idle wake-ups are the point of this strategy
//! when compared against [`MutexPool`](crate::core::MutexPool).

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use crate::core::pool::checked_capacity;
use crate::core::{BoundedPool, CancelToken, PoolError, SyncMechanism, Ticket};

/// Default delay between retries of an empty `take`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Pool guarded by a reader/writer lock.
#[derive(Debug)]
pub struct RwLockPool {
    capacity: NonZeroUsize,
    poll_interval: Duration,
    tickets: RwLock<VecDeque<Ticket>>,
    /// Polls that found the pool empty and went back to sleep.
    idle_polls: AtomicU64,
}

impl RwLockPool {
    /// Create an empty pool polling every [`DEFAULT_POLL_INTERVAL`].
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        Self::with_poll_interval(capacity, DEFAULT_POLL_INTERVAL)
    }

    /// Create an empty pool with a custom poll interval.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] when `capacity` is zero.
    pub fn with_poll_interval(capacity: usize, poll_interval: Duration) -> Result<Self, PoolError> {
        checked_capacity(capacity).map(|capacity| Self::with_capacity(capacity, poll_interval))
    }

    pub(crate) fn with_capacity(capacity: NonZeroUsize, poll_interval: Duration) -> Self {
        Self {
            capacity,
            poll_interval,
            tickets: RwLock::new(VecDeque::with_capacity(capacity.get().min(1024))),
            idle_polls: AtomicU64::new(0),
        }
    }

    /// Delay between retries of an empty `take`.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Total empty polls so far, across all consumers.
    #[must_use]
    pub fn idle_polls(&self) -> u64 {
        self.idle_polls.load(Ordering::Relaxed)
    }
}

impl BoundedPool for RwLockPool {
    fn add(&self, ticket: Ticket) -> bool {
        let mut tickets = self.tickets.write();
        if tickets.len() >= self.capacity.get() {
            return false;
        }
        tickets.push_back(ticket);
        true
    }

    fn take_cancellable(&self, cancel: &CancelToken) -> Result<Ticket, PoolError> {
        loop {
            let head = self.tickets.write().pop_front();
            if let Some(ticket) = head {
                return Ok(ticket);
            }

            self.idle_polls.fetch_add(1, Ordering::Relaxed);
            if !cancel.sleep(self.poll_interval) {
                debug!("rwlock pool take interrupted");
                return Err(PoolError::Interrupted);
            }
        }
    }

    fn size(&self) -> usize {
        self.tickets.read().len()
    }

    fn peek(&self, index: usize) -> Option<Ticket> {
        self.tickets.read().get(index).cloned()
    }

    fn notify_switch(&self, mechanism: SyncMechanism) {
        debug!(requested = %mechanism, "switch notice ignored by rwlock pool instance");
    }

    fn capacity(&self) -> usize {
        self.capacity.get()
    }

    fn mechanism(&self) -> SyncMechanism {
        SyncMechanism::RwLock
    }
}
