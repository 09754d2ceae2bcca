//! Error types for pool operations.

use thiserror::Error;

/// Errors produced by pool strategies and the manager.
///
/// A full pool and an out-of-range peek are not errors: `add` reports the
/// former as `false` and `peek` the latter as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// A blocked `take` was cancelled before a ticket arrived.
    #[error("interrupted while waiting for a ticket")]
    Interrupted,
    /// Pools must hold at least one ticket.
    #[error("invalid capacity {0}: a pool must hold at least one ticket")]
    InvalidCapacity(usize),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
