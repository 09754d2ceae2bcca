//! Channel-backed pool: a bounded crossbeam channel is the ticket transport.
//!
//! Admission is `try_send` (fails fast when full), consumption blocks on
//! receive. The channel has no random access, so `peek` reads a side ledger of
//! in-flight tickets keyed by admission sequence number:
//!
//! - a ledger slot is written *before* the send and removed if the send fails;
//! - a consumer removes the slot *after* receiving the ticket.
//!
//! The ledger is therefore a best-effort view. Under concurrent mutation it can
//! briefly include a ticket whose admission is about to fail, or still include
//! one that was just received, and racing admissions may appear in sequence
//! order rather than channel order. `size` always reports the channel's own
//! length and never exceeds the capacity.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::RwLock;
use tracing::debug;

use crate::core::pool::checked_capacity;
use crate::core::{BoundedPool, CancelToken, PoolError, SyncMechanism, Ticket};

type Envelope = (u64, Ticket);

/// Pool whose synchronization is delegated to a bounded channel.
#[derive(Debug)]
pub struct ChannelPool {
    capacity: NonZeroUsize,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    ledger: RwLock<BTreeMap<u64, Ticket>>,
    next_seq: AtomicU64,
}

impl ChannelPool {
    /// Create an empty pool backed by a channel of `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        checked_capacity(capacity).map(Self::with_capacity)
    }

    pub(crate) fn with_capacity(capacity: NonZeroUsize) -> Self {
        let (tx, rx) = bounded(capacity.get());
        Self {
            capacity,
            tx,
            rx,
            ledger: RwLock::new(BTreeMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Copy of the ledger in admission order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Ticket> {
        self.ledger.read().values().cloned().collect()
    }

    fn settle(&self, (seq, ticket): Envelope) -> Ticket {
        self.ledger.write().remove(&seq);
        ticket
    }
}

impl BoundedPool for ChannelPool {
    fn add(&self, ticket: Ticket) -> bool {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.ledger.write().insert(seq, ticket.clone());

        // The pool owns both ends of the channel, so a failed send means full.
        if self.tx.try_send((seq, ticket)).is_err() {
            self.ledger.write().remove(&seq);
            return false;
        }
        true
    }

    fn take_cancellable(&self, cancel: &CancelToken) -> Result<Ticket, PoolError> {
        // Prefer a ready ticket over a pending cancel, like the other strategies.
        if let Ok(envelope) = self.rx.try_recv() {
            return Ok(self.settle(envelope));
        }

        // `self.tx` lives as long as `self.rx`, so receive never disconnects.
        loop {
            select! {
                recv(self.rx) -> msg => if let Ok(envelope) = msg {
                    return Ok(self.settle(envelope));
                },
                recv(cancel.signal()) -> _ => {
                    debug!("channel pool take interrupted");
                    return Err(PoolError::Interrupted);
                }
            }
        }
    }

    fn size(&self) -> usize {
        self.rx.len()
    }

    fn peek(&self, index: usize) -> Option<Ticket> {
        self.ledger.read().values().nth(index).cloned()
    }

    fn notify_switch(&self, mechanism: SyncMechanism) {
        debug!(requested = %mechanism, "switch notice ignored by channel pool instance");
    }

    fn capacity(&self) -> usize {
        self.capacity.get()
    }

    fn mechanism(&self) -> SyncMechanism {
        SyncMechanism::Channel
    }
}
