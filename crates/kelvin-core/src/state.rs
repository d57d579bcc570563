//! World snapshot: the complete readable state handed to drivers between
//! ticks.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::components::{NavState, Star};
use crate::enums::{EventKind, ObserverKind};
use crate::events::{FleetSnapshot, LogEntry};
use crate::types::{EventId, FleetId, ObserverId, SimTime, StarId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub propagation_speed: f64,
    pub stars: Vec<Star>,
    pub fleets: Vec<FleetView>,
    pub events: Vec<EventView>,
    pub observers: Vec<ObserverView>,
}

/// Ground truth for one fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetView {
    pub id: FleetId,
    pub owner: ObserverId,
    pub position: DVec2,
    pub velocity: f64,
    pub nav: NavState,
    /// Hops remaining after the current leg.
    pub path: Vec<StarId>,
    pub trail: Vec<DVec2>,
}

/// An event in flight, for drawing its wavefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventView {
    pub id: EventId,
    pub kind: EventKind,
    pub anchor: DVec2,
    pub age: u64,
    pub radius: f64,
    /// Star an order is travelling to. `None` for broadcasts.
    pub target: Option<StarId>,
    pub delivered_to: Vec<ObserverId>,
}

/// One observer's fog-of-war view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverView {
    pub id: ObserverId,
    pub name: String,
    pub kind: ObserverKind,
    pub home: StarId,
    pub color: [u8; 3],
    pub known_stars: Vec<Star>,
    pub known_idle_fleets: Vec<FleetSnapshot>,
    pub known_travelling_fleets: Vec<FleetSnapshot>,
    pub log: Vec<LogEntry>,
}
