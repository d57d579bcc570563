//! Snapshot system: builds a complete `WorldSnapshot` for drivers.
//!
//! Read-only; never modifies the world.

use kelvin_core::events::{EventPayload, ObservableEvent};
use kelvin_core::state::{EventView, WorldSnapshot};
use kelvin_core::types::SimTime;

use crate::director::ObservationDirector;
use crate::fleets::FleetRegistry;
use crate::graph::NavigationGraph;
use crate::propagation::EventPropagation;

pub fn build_snapshot(
    time: SimTime,
    graph: &NavigationGraph,
    fleets: &FleetRegistry,
    propagation: &EventPropagation,
    director: &ObservationDirector,
) -> WorldSnapshot {
    WorldSnapshot {
        time,
        propagation_speed: propagation.speed(),
        stars: graph.stars().to_vec(),
        fleets: fleets.ids().filter_map(|id| fleets.view(id)).collect(),
        events: propagation
            .live()
            .iter()
            .map(|e| event_view(e, propagation.speed()))
            .collect(),
        observers: director.observers().map(|o| o.view()).collect(),
    }
}

pub fn event_view(event: &ObservableEvent, speed: f64) -> EventView {
    let target = match event.payload {
        EventPayload::OrderFleetMove { from, .. } => Some(from),
        _ => None,
    };
    EventView {
        id: event.id,
        kind: event.kind(),
        anchor: event.anchor,
        age: event.t,
        radius: event.radius(speed),
        target,
        delivered_to: event.delivered_to.iter().copied().collect(),
    }
}
