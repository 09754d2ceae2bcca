//! Configuration models for the pool and the simulation harness.

pub mod simulation;

pub use simulation::{ConfigError, SimulationConfig, CAPACITY_ENV, DEFAULT_CAPACITY, MECHANISM_ENV};
