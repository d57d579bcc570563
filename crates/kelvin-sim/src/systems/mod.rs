//! Per-tick passes over the world.
//!
//! Systems are free functions over the arenas they touch. They hold no
//! state of their own; anything they learn leaves as emitted events.

pub mod combat;
pub mod movement;
pub mod snapshot;
