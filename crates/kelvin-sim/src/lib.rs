//! Simulation engine for KELVIN.
//!
//! Owns the star graph, the fleet registry and the in-flight events, and
//! advances them one deterministic tick at a time. Each observer sees the
//! galaxy only as the light from events reaches its home star.

pub mod director;
pub mod engine;
pub mod fleets;
pub mod graph;
pub mod observer;
pub mod propagation;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use kelvin_core as core;

#[cfg(test)]
mod tests;
