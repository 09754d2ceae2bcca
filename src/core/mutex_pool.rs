//! Monitor-style pool: one mutex guards the queue, one condition variable wakes consumers.
//!
//! # Examples
//!
//! ```
//! use ticket_pool::core::{BoundedPool, MutexPool, Ticket};
//!
//! let pool = MutexPool::new(2).unwrap();
//! assert!(pool.add(Ticket::from("A")));
//! assert!(pool.add(Ticket::from("B")));
//! assert!(!pool.add(Ticket::from("C")));
//! assert_eq!(pool.take().unwrap(), Ticket::from("A"));
//! assert_eq!(pool.peek(0), Some(Ticket::from("B")));
//! ```

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::core::pool::checked_capacity;
use crate::core::{BoundedPool, CancelToken, PoolError, SyncMechanism, Ticket};

/// Queue and condition variable, shared with cancel hooks.
#[derive(Debug)]
struct Shared {
    tickets: Mutex<VecDeque<Ticket>>,
    /// Signalled on every admission and every removal.
    not_empty: Condvar,
}

/// Pool guarded by a single exclusive lock with wait/notify consumption.
#[derive(Debug)]
pub struct MutexPool {
    capacity: NonZeroUsize,
    shared: Arc<Shared>,
}

impl MutexPool {
    /// Create an empty pool holding at most `capacity` tickets.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        checked_capacity(capacity).map(Self::with_capacity)
    }

    pub(crate) fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            shared: Arc::new(Shared {
                tickets: Mutex::new(VecDeque::with_capacity(capacity.get().min(1024))),
                not_empty: Condvar::new(),
            }),
        }
    }
}

impl BoundedPool for MutexPool {
    fn add(&self, ticket: Ticket) -> bool {
        let mut tickets = self.shared.tickets.lock();
        if tickets.len() >= self.capacity.get() {
            return false;
        }
        tickets.push_back(ticket);
        self.shared.not_empty.notify_one();
        true
    }

    fn take_cancellable(&self, cancel: &CancelToken) -> Result<Ticket, PoolError> {
        // Fast path: no hook registration when a ticket is already waiting.
        {
            let mut tickets = self.shared.tickets.lock();
            if let Some(ticket) = tickets.pop_front() {
                self.shared.not_empty.notify_one();
                return Ok(ticket);
            }
        }

        // The hook must be registered before the lock is taken; see CancelToken::cancel.
        let shared = Arc::clone(&self.shared);
        let _hook = cancel.on_cancel(Arc::new(move || {
            let _tickets = shared.tickets.lock();
            shared.not_empty.notify_all();
        }));

        let mut tickets = self.shared.tickets.lock();
        loop {
            // Cancellation is only honoured while empty, so a waiter woken by
            // notify_one always consumes the ticket it was woken for.
            if let Some(ticket) = tickets.pop_front() {
                self.shared.not_empty.notify_one();
                return Ok(ticket);
            }
            if cancel.is_cancelled() {
                debug!("mutex pool take interrupted");
                return Err(PoolError::Interrupted);
            }
            self.shared.not_empty.wait(&mut tickets);
            trace!("mutex pool consumer woke");
        }
    }

    fn size(&self) -> usize {
        self.shared.tickets.lock().len()
    }

    fn peek(&self, index: usize) -> Option<Ticket> {
        self.shared.tickets.lock().get(index).cloned()
    }

    fn notify_switch(&self, mechanism: SyncMechanism) {
        debug!(requested = %mechanism, "switch notice ignored by mutex pool instance");
    }

    fn capacity(&self) -> usize {
        self.capacity.get()
    }

    fn mechanism(&self) -> SyncMechanism {
        SyncMechanism::Mutex
    }
}
