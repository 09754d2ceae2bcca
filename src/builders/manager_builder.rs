//! Builders to construct pool managers from configuration.

use crate::config::{ConfigError, SimulationConfig};
use crate::core::PoolManager;

/// Build a [`PoolManager`] from validated simulation configuration.
pub fn build_manager(cfg: &SimulationConfig) -> Result<PoolManager, ConfigError> {
    cfg.validate()?;
    let manager =
        PoolManager::with_settings(cfg.capacity, cfg.mechanism, cfg.rwlock_poll_interval())?;
    Ok(manager)
}
