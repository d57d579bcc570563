//! Movement pass and path continuation.
//!
//! Advances travelling fleets, reports every docking as an arrival, and
//! after combat sends the survivors on to their next hop.

use glam::DVec2;

use kelvin_core::events::EventPayload;
use kelvin_core::types::FleetId;

use crate::fleets::{FleetRegistry, Leg};
use crate::graph::NavigationGraph;
use crate::propagation::EventPropagation;

/// Advance all fleets one tick and emit an arrival for each docking.
/// Returns the fleets that docked, ascending by id.
pub fn run(
    fleets: &mut FleetRegistry,
    graph: &NavigationGraph,
    propagation: &mut EventPropagation,
    tick: u64,
    trail_length: usize,
) -> Vec<FleetId> {
    let arrived = fleets.update(graph, propagation.speed(), tick, trail_length);

    for &id in &arrived {
        let Some(fleet) = fleets.snapshot(id) else {
            continue;
        };
        let Some(star) = graph.star(fleet.nav.source()) else {
            continue;
        };
        propagation.emit(
            star.position,
            EventPayload::FleetArrival {
                fleet,
                star: star.clone(),
            },
        );
    }

    arrived
}

/// Start the next hop for every surviving arrival with a pending path.
pub fn continue_paths(
    arrived: &[FleetId],
    fleets: &mut FleetRegistry,
    graph: &NavigationGraph,
    propagation: &mut EventPropagation,
) {
    for &id in arrived {
        if let Some(leg) = fleets.continue_path(id) {
            if let Some((anchor, payload)) = departure(fleets, graph, &leg) {
                propagation.emit(anchor, payload);
            }
        }
    }
}

/// Build the departure event for a leg that has just begun.
pub fn departure(
    fleets: &FleetRegistry,
    graph: &NavigationGraph,
    leg: &Leg,
) -> Option<(DVec2, EventPayload)> {
    let fleet = fleets.snapshot(leg.fleet)?;
    let from = graph.star(leg.from)?;
    let to = graph.star(leg.to)?;
    Some((
        from.position,
        EventPayload::FleetDeparture {
            fleet,
            from: from.clone(),
            to: to.clone(),
        },
    ))
}
