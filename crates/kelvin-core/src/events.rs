//! Observable events: information travelling outward from where something
//! happened at the propagation speed.

use std::collections::BTreeSet;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::components::{NavState, Star};
use crate::enums::EventKind;
use crate::types::{EventId, FleetId, ObserverId, StarId};

/// A fleet as it was observed when an event was emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub id: FleetId,
    pub owner: ObserverId,
    pub position: DVec2,
    pub nav: NavState,
    pub velocity: f64,
}

/// Kind-specific event content. Star payloads are copies taken at emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventPayload {
    FleetDeparture {
        fleet: FleetSnapshot,
        from: Star,
        to: Star,
    },
    FleetArrival {
        fleet: FleetSnapshot,
        star: Star,
    },
    CombatReport {
        star: Star,
        destroyed: FleetSnapshot,
        victor: FleetSnapshot,
    },
    /// A command in transit to the star where `fleet` should be docked.
    OrderFleetMove {
        fleet: FleetId,
        from: StarId,
        to: StarId,
        by: ObserverId,
    },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::FleetDeparture { .. } => EventKind::FleetDeparture,
            EventPayload::FleetArrival { .. } => EventKind::FleetArrival,
            EventPayload::CombatReport { .. } => EventKind::CombatReport,
            EventPayload::OrderFleetMove { .. } => EventKind::OrderFleetMove,
        }
    }
}

/// An event in flight. Its wavefront radius is `t * c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableEvent {
    pub id: EventId,
    pub anchor: DVec2,
    /// Age in ticks.
    pub t: u64,
    pub payload: EventPayload,
    /// Observers this broadcast has reached so far.
    pub delivered_to: BTreeSet<ObserverId>,
}

impl ObservableEvent {
    pub fn new(id: EventId, anchor: DVec2, payload: EventPayload) -> Self {
        Self {
            id,
            anchor,
            t: 0,
            payload,
            delivered_to: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Wavefront radius for propagation speed `c`.
    pub fn radius(&self, c: f64) -> f64 {
        self.t as f64 * c
    }

    /// Whether the wavefront has reached `point` (inclusive).
    pub fn reaches(&self, point: DVec2, c: f64) -> bool {
        let radius = self.radius(c);
        self.anchor.distance_squared(point) <= radius * radius
    }
}

/// A line in a human observer's message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub tick: u64,
    pub message: String,
}
