//! Stable pool handle whose synchronization strategy can be replaced at runtime.
//!
//! The manager keeps the active strategy behind one `Arc<dyn BoundedPool>`.
//! Every forwarded call clones that `Arc` and releases the manager's lock
//! before touching the strategy, so a blocking `take` never holds up a switch.
//! The flip side: a call that already obtained the old strategy runs to
//! completion against it, while calls made after the switch see the new one.
//! Callers that need a clean cut must quiesce their workers first.
//!
//! Switching never migrates tickets. The replacement starts empty.
//!
//! # Examples
//!
//! ```
//! use ticket_pool::core::{BoundedPool, PoolManager, SyncMechanism, Ticket};
//!
//! let manager = PoolManager::new(10).unwrap();
//! assert_eq!(manager.current_mechanism(), SyncMechanism::Mutex);
//!
//! manager.add(Ticket::from("Ticket-P1-0"));
//! manager.switch_mechanism(SyncMechanism::Channel);
//!
//! assert_eq!(manager.current_mechanism(), SyncMechanism::Channel);
//! assert_eq!(manager.size(), 0);
//! assert_eq!(manager.capacity(), 10);
//! ```

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::core::pool::checked_capacity;
use crate::core::rwlock_pool::DEFAULT_POLL_INTERVAL;
use crate::core::{
    BoundedPool, CancelToken, ChannelPool, MutexPool, PoolError, RwLockPool, SyncMechanism, Ticket,
};

/// Hot-swappable front for the three pool strategies.
pub struct PoolManager {
    capacity: NonZeroUsize,
    rwlock_poll_interval: Duration,
    active: RwLock<Arc<dyn BoundedPool>>,
}

impl PoolManager {
    /// Create a manager backed by a [`MutexPool`] of `capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        Self::with_mechanism(capacity, SyncMechanism::Mutex)
    }

    /// Create a manager starting on `mechanism`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] when `capacity` is zero.
    pub fn with_mechanism(capacity: usize, mechanism: SyncMechanism) -> Result<Self, PoolError> {
        Self::with_settings(capacity, mechanism, DEFAULT_POLL_INTERVAL)
    }

    /// Create a manager starting on `mechanism`, using `rwlock_poll_interval`
    /// for every [`RwLockPool`] it builds.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] when `capacity` is zero.
    pub fn with_settings(
        capacity: usize,
        mechanism: SyncMechanism,
        rwlock_poll_interval: Duration,
    ) -> Result<Self, PoolError> {
        let capacity = checked_capacity(capacity)?;
        let active = build_strategy(mechanism, capacity, rwlock_poll_interval);
        info!(capacity = capacity.get(), mechanism = %mechanism, "ticket pool manager initialized");
        Ok(Self {
            capacity,
            rwlock_poll_interval,
            active: RwLock::new(active),
        })
    }

    /// Replace the active strategy with a fresh, empty one of `mechanism`.
    ///
    /// Tickets held by the previous strategy are discarded. Switching to the
    /// mechanism already in use still resets the pool.
    pub fn switch_mechanism(&self, mechanism: SyncMechanism) {
        let replacement = build_strategy(mechanism, self.capacity, self.rwlock_poll_interval);
        let previous = {
            let mut active = self.active.write();
            std::mem::replace(&mut *active, replacement)
        };

        previous.notify_switch(mechanism);
        let discarded = previous.size();
        if discarded > 0 {
            warn!(
                from = %previous.mechanism(),
                to = %mechanism,
                discarded,
                "tickets left in the previous pool were discarded"
            );
        }
        info!(from = %previous.mechanism(), to = %mechanism, "Switched to {mechanism} implementation");
    }

    /// Mechanism of the active strategy.
    #[must_use]
    pub fn current_mechanism(&self) -> SyncMechanism {
        self.active.read().mechanism()
    }

    /// Capacity every strategy built by this manager receives.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Poll interval handed to [`RwLockPool`] strategies.
    #[must_use]
    pub const fn rwlock_poll_interval(&self) -> Duration {
        self.rwlock_poll_interval
    }

    /// The active strategy. Holding the returned handle pins that instance
    /// even across later switches.
    #[must_use]
    pub fn current(&self) -> Arc<dyn BoundedPool> {
        Arc::clone(&self.active.read())
    }
}

impl BoundedPool for PoolManager {
    fn add(&self, ticket: Ticket) -> bool {
        self.current().add(ticket)
    }

    fn take_cancellable(&self, cancel: &CancelToken) -> Result<Ticket, PoolError> {
        self.current().take_cancellable(cancel)
    }

    fn size(&self) -> usize {
        self.current().size()
    }

    fn peek(&self, index: usize) -> Option<Ticket> {
        self.current().peek(index)
    }

    /// On the manager this performs the switch.
    fn notify_switch(&self, mechanism: SyncMechanism) {
        self.switch_mechanism(mechanism);
    }

    fn capacity(&self) -> usize {
        self.capacity.get()
    }

    fn mechanism(&self) -> SyncMechanism {
        self.current_mechanism()
    }
}

impl std::fmt::Debug for PoolManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolManager")
            .field("capacity", &self.capacity)
            .field("mechanism", &self.current_mechanism())
            .field("size", &self.size())
            .finish()
    }
}

fn build_strategy(
    mechanism: SyncMechanism,
    capacity: NonZeroUsize,
    rwlock_poll_interval: Duration,
) -> Arc<dyn BoundedPool> {
    match mechanism {
        SyncMechanism::Mutex => Arc::new(MutexPool::with_capacity(capacity)),
        SyncMechanism::RwLock => Arc::new(RwLockPool::with_capacity(capacity, rwlock_poll_interval)),
        SyncMechanism::Channel => Arc::new(ChannelPool::with_capacity(capacity)),
    }
}
