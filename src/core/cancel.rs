//! Cancellation signal for blocked consumers and sleeping workers.
//!
//! A [`CancelToken`] is shared between the task that may block (a consumer in
//! `take`, a worker between iterations) and whoever wants to stop it. Cancelling
//! is one-way and idempotent.
//!
//! Three wake paths exist, one per way a strategy can block:
//!
//! - a disconnect-only channel ([`CancelToken::signal`]) that `select!` and
//!   `recv_timeout` callers observe as soon as the trigger sender is dropped;
//! - wake hooks registered by condition-variable waiters, run once on cancel;
//! - the plain flag ([`CancelToken::is_cancelled`]) checked by every loop.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

/// Callback run on cancellation to wake a waiter parked on a condition variable.
pub(crate) type WakeHook = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    cancelled: AtomicBool,
    /// Never sent on; dropping it disconnects `signal`.
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
    hooks: Mutex<HashMap<u64, WakeHook>>,
    next_hook: AtomicU64,
}

/// Cloneable, one-shot cancellation token.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ticket_pool::core::CancelToken;
///
/// let token = CancelToken::new();
/// let remote = token.clone();
/// remote.cancel();
/// assert!(token.is_cancelled());
/// // Sleeping on a cancelled token returns immediately.
/// assert!(!token.sleep(Duration::from_secs(60)));
/// ```
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Create a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        let (trigger, signal) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                signal,
                hooks: Mutex::new(HashMap::new()),
                next_hook: AtomicU64::new(0),
            }),
        }
    }

    /// Cancel the token, waking everything currently blocked on it.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        drop(self.inner.trigger.lock().take());

        // Run hooks outside the registry lock: a hook takes its pool's lock,
        // and waiters register while not holding it, so the order stays acyclic.
        let hooks: Vec<WakeHook> = self.inner.hooks.lock().values().cloned().collect();
        for hook in hooks {
            hook();
        }
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// Returns `true` when the full duration elapsed, `false` when the token
    /// was (or became) cancelled.
    #[must_use]
    pub fn sleep(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }
        matches!(
            self.inner.signal.recv_timeout(duration),
            Err(RecvTimeoutError::Timeout)
        )
    }

    /// Receiver that becomes disconnected on cancel. Nothing is ever sent on it.
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }

    /// Register `hook` to run on cancel for as long as the guard lives.
    ///
    /// Callers must check [`is_cancelled`](Self::is_cancelled) after
    /// registering: a cancel that completed before registration does not run
    /// the hook.
    pub(crate) fn on_cancel(&self, hook: WakeHook) -> HookGuard<'_> {
        let id = self.inner.next_hook.fetch_add(1, Ordering::Relaxed);
        self.inner.hooks.lock().insert(id, hook);
        HookGuard { token: self, id }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Deregisters a wake hook when dropped.
pub(crate) struct HookGuard<'a> {
    token: &'a CancelToken,
    id: u64,
}

impl Drop for HookGuard<'_> {
    fn drop(&mut self) {
        self.token.inner.hooks.lock().remove(&self.id);
    }
}
