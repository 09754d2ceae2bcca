//! The bounded pool capability shared by every synchronization strategy.

use std::num::NonZeroUsize;

use crate::core::{CancelToken, PoolError, SyncMechanism, Ticket};

/// A bounded FIFO buffer of tickets safe to share between threads.
///
/// Implementations differ only in how they synchronize; the observable
/// contract is the same:
///
/// - `0 <= size() <= capacity()` at every observable instant;
/// - `add` never blocks and rejects with `false` when full;
/// - `take` blocks only while the pool is empty;
/// - `size` and `peek` never wait for a ticket.
pub trait BoundedPool: Send + Sync {
    /// Append `ticket` at the tail. Returns `false` without side effects when
    /// the pool is full.
    fn add(&self, ticket: Ticket) -> bool;

    /// Remove and return the head ticket, waiting while the pool is empty.
    ///
    /// Fails with [`PoolError::Interrupted`] if `cancel` fires while waiting;
    /// in that case no ticket is removed.
    fn take_cancellable(&self, cancel: &CancelToken) -> Result<Ticket, PoolError>;

    /// Remove and return the head ticket, waiting without bound.
    fn take(&self) -> Result<Ticket, PoolError> {
        self.take_cancellable(&CancelToken::new())
    }

    /// Number of tickets currently held.
    fn size(&self) -> usize;

    /// Ticket at `index` from the head, without removing it.
    fn peek(&self, index: usize) -> Option<Ticket>;

    /// Accepted for interface uniformity. Strategy instances ignore it;
    /// switching belongs to [`PoolManager`](crate::core::PoolManager).
    fn notify_switch(&self, mechanism: SyncMechanism);

    /// Fixed capacity chosen at construction.
    fn capacity(&self) -> usize;

    /// Which strategy is serving requests.
    fn mechanism(&self) -> SyncMechanism;
}

/// Validate a requested capacity.
pub(crate) fn checked_capacity(capacity: usize) -> Result<NonZeroUsize, PoolError> {
    NonZeroUsize::new(capacity).ok_or(PoolError::InvalidCapacity(capacity))
}
