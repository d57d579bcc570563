//! Combat pass: resolves hostile fleets sharing a star after movement.
//!
//! Only stars where some fleet docked this tick are contested. The owner
//! of the longest-docked fleet there holds the star (lowest fleet id breaks
//! ties); every fleet of any other owner is destroyed. The outcome depends
//! only on dock times and ids, never on iteration order.

use std::collections::BTreeSet;

use tracing::info;

use kelvin_core::components::NavState;
use kelvin_core::events::EventPayload;
use kelvin_core::types::{FleetId, StarId};

use crate::fleets::FleetRegistry;
use crate::graph::NavigationGraph;
use crate::propagation::EventPropagation;

/// Resolve combat at every star an arrival docked at. Returns the
/// destroyed fleets, ascending by id within each star.
pub fn run(
    arrived: &[FleetId],
    fleets: &mut FleetRegistry,
    graph: &NavigationGraph,
    propagation: &mut EventPropagation,
) -> Vec<FleetId> {
    let contested: BTreeSet<StarId> = arrived
        .iter()
        .filter_map(|&id| fleets.nav(id)?.docked_at())
        .collect();

    let mut destroyed = Vec::new();
    for star_id in contested {
        destroyed.extend(resolve_star(star_id, fleets, graph, propagation));
    }
    destroyed
}

fn resolve_star(
    star_id: StarId,
    fleets: &mut FleetRegistry,
    graph: &NavigationGraph,
    propagation: &mut EventPropagation,
) -> Vec<FleetId> {
    let residents: Vec<_> = fleets
        .docked_at(star_id)
        .into_iter()
        .filter_map(|id| fleets.snapshot(id))
        .collect();

    let Some(victor) = residents
        .iter()
        .min_by_key(|f| (docked_since(f.nav), f.id))
        .cloned()
    else {
        return Vec::new();
    };
    let losers: Vec<_> = residents
        .into_iter()
        .filter(|f| f.owner != victor.owner)
        .collect();
    if losers.is_empty() {
        return Vec::new();
    }
    let Some(star) = graph.star(star_id) else {
        return Vec::new();
    };

    let mut destroyed = Vec::with_capacity(losers.len());
    for loser in losers {
        info!(
            star = %star.name,
            destroyed = %loser.id,
            victor = %victor.id,
            "fleet destroyed"
        );
        fleets.despawn(loser.id);
        destroyed.push(loser.id);
        propagation.emit(
            star.position,
            EventPayload::CombatReport {
                star: star.clone(),
                destroyed: loser,
                victor: victor.clone(),
            },
        );
    }
    destroyed
}

fn docked_since(nav: NavState) -> u64 {
    match nav {
        NavState::Docked { since, .. } => since,
        NavState::Travelling { .. } => u64::MAX,
    }
}
