//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Who drives an observer. Only humans keep a message log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObserverKind {
    #[default]
    Human,
    Automated,
}

/// Discriminant of an observable event, for views and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    FleetDeparture,
    FleetArrival,
    CombatReport,
    OrderFleetMove,
}

impl EventKind {
    /// Broadcast events go to every observer; orders have one target star.
    pub fn is_broadcast(&self) -> bool {
        !matches!(self, EventKind::OrderFleetMove)
    }
}
