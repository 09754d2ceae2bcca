//! Simulation runtime: worker threads, the worker registry and the admin shell.

pub mod shell;
pub mod simulation;
pub mod worker;

pub use shell::{Command, CommandError, Shell};
pub use simulation::{PoolState, Simulation, SimulationError};
pub use worker::{WorkerHandle, WorkerRole, WorkerSettings, WorkerStats};
