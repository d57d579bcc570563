//! Core types and definitions for the KELVIN simulation.
//!
//! This crate defines the vocabulary shared by the simulation and its
//! drivers: typed ids, components, observable events, commands, state
//! snapshots, constants and the error type. It holds no simulation logic.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use error::{SimError, SimResult};

#[cfg(test)]
mod tests;
