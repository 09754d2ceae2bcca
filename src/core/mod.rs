//! Bounded ticket pool: the capability trait, its synchronization strategies and the manager.

pub mod cancel;
pub mod channel_pool;
pub mod error;
pub mod manager;
pub mod mutex_pool;
pub mod pool;
pub mod rwlock_pool;
pub mod ticket;

pub use cancel::CancelToken;
pub use channel_pool::ChannelPool;
pub use error::{AppResult, PoolError};
pub use manager::PoolManager;
pub use mutex_pool::MutexPool;
pub use pool::BoundedPool;
pub use rwlock_pool::{RwLockPool, DEFAULT_POLL_INTERVAL};
pub use ticket::{SyncMechanism, Ticket, UnknownMechanism};
