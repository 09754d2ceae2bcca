//! # Ticket Pool
//!
//! A bounded, thread-safe FIFO pool of tickets with interchangeable
//! synchronization strategies, plus a small simulation harness that drives it
//! with producer, consumer and reader threads.
//!
//! ## Strategies
//!
//! Every strategy implements [`BoundedPool`]:
//!
//! - [`MutexPool`]: one mutex plus a "not empty" condition variable. Blocked
//!   takers are woken on every add.
//! - [`RwLockPool`]: a reader/writer lock. Size and peek run concurrently;
//!   blocked takers poll at a fixed interval.
//! - [`ChannelPool`]: a bounded channel. `add` never blocks; `take` blocks on
//!   the receive side.
//!
//! [`PoolManager`] holds exactly one active strategy, forwards every call to
//! it and can switch to a fresh, empty instance of another strategy at
//! runtime. Tickets held by the old instance are discarded on a switch.
//!
//! ```rust
//! use ticket_pool::{BoundedPool, PoolManager, SyncMechanism, Ticket};
//!
//! let pool = PoolManager::new(2)?;
//! assert!(pool.add(Ticket::from("T1")));
//! assert!(pool.add(Ticket::from("T2")));
//! assert!(!pool.add(Ticket::from("T3")));
//!
//! pool.switch_mechanism(SyncMechanism::Channel);
//! assert_eq!(pool.size(), 0);
//! # Ok::<(), ticket_pool::PoolError>(())
//! ```
//!
//! ## Cancellation
//!
//! `take` blocks while the pool is empty. Pass a [`CancelToken`] to
//! [`BoundedPool::take_cancellable`] to make the wait interruptible; a
//! cancelled waiter returns [`PoolError::Interrupted`] and removes nothing.
//!
//! ## Simulation
//!
//! [`Simulation`] owns a manager and named worker threads. [`Shell`] parses
//! operator commands (`add-producer P1 500`, `switch-sync RWLOCK`, `state`,
//! ...) and applies them to a simulation.

/// Ticket pool abstractions, strategies and the runtime-switchable manager.
pub mod core;
/// Configuration models for the pool and the simulation.
pub mod config;
/// Builders to construct pool components from configuration.
pub mod builders;
/// Worker threads, the simulation registry and the admin shell.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::builders::build_manager;
pub use crate::config::{ConfigError, SimulationConfig};
pub use crate::core::{
    AppResult, BoundedPool, CancelToken, ChannelPool, MutexPool, PoolError, PoolManager,
    RwLockPool, SyncMechanism, Ticket, UnknownMechanism,
};
pub use crate::runtime::{
    Command, CommandError, PoolState, Shell, Simulation, SimulationError, WorkerHandle,
    WorkerRole, WorkerSettings, WorkerStats,
};
