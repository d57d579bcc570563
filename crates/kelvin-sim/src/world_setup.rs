//! World builders: the hand-made local cluster and seeded random clusters.

use glam::DVec2;
use rand::Rng;

use kelvin_core::constants::*;
use kelvin_core::enums::ObserverKind;
use kelvin_core::types::{FleetId, ObserverId, StarId};
use kelvin_core::SimResult;

use crate::engine::SimulationEngine;

/// Ids of everything `setup_local_cluster` creates.
#[derive(Debug, Clone, Copy)]
pub struct LocalCluster {
    pub sol: StarId,
    pub procyon: StarId,
    pub epsilon_eridani: StarId,
    pub tau_ceti: StarId,
    pub lalande: StarId,
    pub federation: ObserverId,
    pub hegemony: ObserverId,
    pub federation_fleet: FleetId,
    pub hegemony_fleet: FleetId,
}

/// Five stars around Sol, a human observer at Sol and an automated one at
/// Epsilon Eridani, each with one fleet at home.
pub fn setup_local_cluster(engine: &mut SimulationEngine) -> SimResult<LocalCluster> {
    let sol = engine.add_star("Sol", 100.0, 100.0)?;
    let procyon = engine.add_star("Procyon", 250.0, 0.0)?;
    let epsilon_eridani = engine.add_star("Epsilon Eridani", 300.0, 200.0)?;
    let tau_ceti = engine.add_star("Tau Ceti", 200.0, 150.0)?;
    let lalande = engine.add_star("Lalande", 50.0, 350.0)?;

    engine.connect_stars(sol, tau_ceti)?;
    engine.connect_stars(tau_ceti, lalande)?;
    engine.connect_stars(tau_ceti, epsilon_eridani)?;
    engine.connect_stars(sol, procyon)?;
    engine.connect_stars(procyon, tau_ceti)?;

    let federation = engine.add_observer("Federation", sol, ObserverKind::Human, [60, 120, 255])?;
    let hegemony = engine.add_observer(
        "Hegemony",
        epsilon_eridani,
        ObserverKind::Automated,
        [200, 20, 20],
    )?;
    let federation_fleet = engine.spawn_fleet(federation, sol)?;
    let hegemony_fleet = engine.spawn_fleet(hegemony, epsilon_eridani)?;

    Ok(LocalCluster {
        sol,
        procyon,
        epsilon_eridani,
        tau_ceti,
        lalande,
        federation,
        hegemony,
        federation_fleet,
        hegemony_fleet,
    })
}

/// Add `count` stars at seeded random positions and connect them.
///
/// Each star links to its nearest already-placed star, which keeps the
/// cluster connected, and then to its nearest star it is not yet linked to.
/// Returns the new star ids in placement order.
pub fn generate_cluster(engine: &mut SimulationEngine, count: usize) -> SimResult<Vec<StarId>> {
    let positions = scatter(engine, count);

    let mut ids = Vec::with_capacity(count);
    for (index, position) in positions.iter().enumerate() {
        let name = unused_name(engine, index);
        ids.push(engine.add_star(&name, position.x, position.y)?);
    }

    for i in 1..ids.len() {
        if let Some(j) = nearest(&positions, i, |j| j < i) {
            engine.connect_stars(ids[i], ids[j])?;
        }
    }
    for i in 0..ids.len() {
        let graph = engine.graph();
        if let Some(j) = nearest(&positions, i, |j| !graph.are_adjacent(ids[i], ids[j])) {
            engine.connect_stars(ids[i], ids[j])?;
        }
    }

    Ok(ids)
}

fn scatter(engine: &mut SimulationEngine, count: usize) -> Vec<DVec2> {
    let rng = engine.rng_mut();
    let mut placed: Vec<DVec2> = Vec::with_capacity(count);
    for _ in 0..count {
        let mut candidate = DVec2::ZERO;
        for _ in 0..CLUSTER_PLACEMENT_ATTEMPTS {
            candidate = DVec2::new(
                rng.gen_range(0.0..CLUSTER_FIELD_SIZE),
                rng.gen_range(0.0..CLUSTER_FIELD_SIZE),
            );
            if placed
                .iter()
                .all(|p| p.distance(candidate) >= CLUSTER_MIN_SPACING)
            {
                break;
            }
        }
        placed.push(candidate);
    }
    placed
}

/// Nearest other position to `positions[i]` among those `eligible`.
/// Ties go to the lower index.
fn nearest(positions: &[DVec2], i: usize, eligible: impl Fn(usize) -> bool) -> Option<usize> {
    (0..positions.len())
        .filter(|&j| j != i && eligible(j))
        .min_by(|&a, &b| {
            let da = positions[i].distance_squared(positions[a]);
            let db = positions[i].distance_squared(positions[b]);
            da.total_cmp(&db).then(a.cmp(&b))
        })
}

fn unused_name(engine: &SimulationEngine, index: usize) -> String {
    let base = STAR_CATALOGUE[index % STAR_CATALOGUE.len()];
    let mut round = index / STAR_CATALOGUE.len();
    loop {
        let name = if round == 0 {
            base.to_string()
        } else {
            format!("{base} {}", round + 1)
        };
        if engine.graph().find_by_name(&name).is_none() {
            return name;
        }
        round += 1;
    }
}
