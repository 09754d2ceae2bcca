//! Registry of running workers around one shared [`PoolManager`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::builders::build_manager;
use crate::config::{ConfigError, SimulationConfig};
use crate::core::{BoundedPool, PoolManager, SyncMechanism, Ticket};
use crate::runtime::worker::{WorkerHandle, WorkerRole, WorkerSettings, WorkerStats};

/// Errors produced while managing simulation workers.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The pool could not be built from configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A worker thread could not be started.
    #[error("failed to spawn {role} `{id}`: {source}")]
    Spawn {
        /// Role of the worker.
        role: WorkerRole,
        /// Requested worker id.
        id: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// Point-in-time view of the pool and its workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    /// Active strategy.
    pub mechanism: SyncMechanism,
    /// Pool capacity.
    pub capacity: usize,
    /// Tickets currently available.
    pub available: usize,
    /// Running producers.
    pub producers: usize,
    /// Running consumers.
    pub consumers: usize,
    /// Running readers.
    pub readers: usize,
    /// First few tickets from the head.
    pub samples: Vec<Ticket>,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "------------------------------------";
        writeln!(f, "--------- Ticket Pool State ---------")?;
        writeln!(f, "Current synchronization: {}", self.mechanism)?;
        writeln!(f, "Pool capacity: {}", self.capacity)?;
        writeln!(f, "Available tickets: {}", self.available)?;
        writeln!(f, "Active producers: {}", self.producers)?;
        writeln!(f, "Active consumers: {}", self.consumers)?;
        writeln!(f, "Active readers: {}", self.readers)?;
        writeln!(f, "{RULE}")?;

        if self.available > 0 {
            writeln!(f, "Sample tickets:")?;
            for ticket in &self.samples {
                writeln!(f, "- {ticket}")?;
            }
            if self.available > self.samples.len() {
                writeln!(f, "- ... and {} more", self.available - self.samples.len())?;
            }
            writeln!(f, "{RULE}")?;
        }
        Ok(())
    }
}

/// Owns the pool manager and every worker driving it.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    pool: Arc<PoolManager>,
    producers: HashMap<String, WorkerHandle>,
    consumers: HashMap<String, WorkerHandle>,
    readers: HashMap<String, WorkerHandle>,
}

impl Simulation {
    /// Build the pool described by `config`, with no workers.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let pool = Arc::new(build_manager(&config)?);
        Ok(Self {
            config,
            pool,
            producers: HashMap::new(),
            consumers: HashMap::new(),
            readers: HashMap::new(),
        })
    }

    /// Shared pool handle.
    #[must_use]
    pub const fn pool(&self) -> &Arc<PoolManager> {
        &self.pool
    }

    /// Configuration the simulation was built with.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Start a worker. A running worker with the same role and id is stopped
    /// and replaced.
    pub fn add_worker(
        &mut self,
        role: WorkerRole,
        id: &str,
        delay: Duration,
    ) -> Result<(), SimulationError> {
        let settings = WorkerSettings {
            delay,
            backoff_factor: self.config.full_pool_backoff_factor,
        };
        let pool: Arc<dyn BoundedPool> = Arc::clone(&self.pool) as Arc<dyn BoundedPool>;
        let handle =
            WorkerHandle::spawn(role, id, pool, settings).map_err(|source| SimulationError::Spawn {
                role,
                id: id.to_string(),
                source,
            })?;

        if let Some(previous) = self.registry_mut(role).insert(id.to_string(), handle) {
            info!(role = %role, worker = %id, "replacing running worker with the same id");
            previous.stop_and_join();
        }
        info!(role = %role, worker = %id, delay_ms = delay.as_millis(), "worker added");
        Ok(())
    }

    /// Stop and join a worker. Returns its final stats, or `None` if no such
    /// worker was running.
    pub fn remove_worker(&mut self, role: WorkerRole, id: &str) -> Option<WorkerStats> {
        let handle = self.registry_mut(role).remove(id)?;
        let stats = handle.stop_and_join();
        info!(role = %role, worker = %id, "worker removed");
        Some(stats)
    }

    /// Stats of a running worker.
    #[must_use]
    pub fn worker_stats(&self, role: WorkerRole, id: &str) -> Option<WorkerStats> {
        self.registry(role).get(id).map(WorkerHandle::stats)
    }

    /// Number of running workers of `role`.
    #[must_use]
    pub fn worker_count(&self, role: WorkerRole) -> usize {
        self.registry(role).len()
    }

    /// Sorted ids of running workers of `role`.
    #[must_use]
    pub fn worker_ids(&self, role: WorkerRole) -> Vec<String> {
        let mut ids: Vec<String> = self.registry(role).keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Switch the pool's strategy. Running workers keep their pool handle and
    /// pick up the new strategy on their next call.
    pub fn switch_mechanism(&self, mechanism: SyncMechanism) {
        self.pool.switch_mechanism(mechanism);
    }

    /// Snapshot of the pool and worker counts.
    #[must_use]
    pub fn state(&self) -> PoolState {
        let available = self.pool.size();
        let samples = (0..available.min(self.config.state_sample_size))
            .filter_map(|index| self.pool.peek(index))
            .collect();
        PoolState {
            mechanism: self.pool.current_mechanism(),
            capacity: self.pool.capacity(),
            available,
            producers: self.producers.len(),
            consumers: self.consumers.len(),
            readers: self.readers.len(),
            samples,
        }
    }

    /// Stop and join every worker. Returns the ids removed per role.
    pub fn shutdown(&mut self) -> Vec<(WorkerRole, String)> {
        let mut removed = Vec::new();
        for role in [WorkerRole::Producer, WorkerRole::Consumer, WorkerRole::Reader] {
            for id in self.worker_ids(role) {
                self.remove_worker(role, &id);
                removed.push((role, id));
            }
        }
        if !removed.is_empty() {
            info!(workers = removed.len(), "simulation shut down");
        }
        removed
    }

    const fn registry(&self, role: WorkerRole) -> &HashMap<String, WorkerHandle> {
        match role {
            WorkerRole::Producer => &self.producers,
            WorkerRole::Consumer => &self.consumers,
            WorkerRole::Reader => &self.readers,
        }
    }

    fn registry_mut(&mut self, role: WorkerRole) -> &mut HashMap<String, WorkerHandle> {
        match role {
            WorkerRole::Producer => &mut self.producers,
            WorkerRole::Consumer => &mut self.consumers,
            WorkerRole::Reader => &mut self.readers,
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.shutdown();
    }
}
