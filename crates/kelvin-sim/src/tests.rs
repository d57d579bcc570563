//! Tests for the simulation engine: order latency, movement, combat,
//! delivery and determinism.

use kelvin_core::commands::{Command, CommandOutcome};
use kelvin_core::components::NavState;
use kelvin_core::enums::{EventKind, ObserverKind};
use kelvin_core::types::{FleetId, ObserverId, StarId};
use kelvin_core::SimError;

use crate::engine::{SimConfig, SimulationEngine};
use crate::world_setup;

const BLUE: [u8; 3] = [60, 120, 255];
const RED: [u8; 3] = [200, 20, 20];

fn engine() -> SimulationEngine {
    SimulationEngine::new(SimConfig::default())
}

fn tick_n(engine: &mut SimulationEngine, n: usize) {
    for _ in 0..n {
        engine.tick().unwrap();
    }
}

fn count_live(engine: &SimulationEngine, kind: EventKind) -> usize {
    engine.events().iter().filter(|e| e.kind() == kind).count()
}

// ---- Order latency ----

#[test]
fn test_order_latency_matches_distance_over_c() {
    let mut engine = engine();
    let home = engine.add_star("Home", 0.0, 0.0).unwrap();
    let far = engine.add_star("Far", 500.0, 0.0).unwrap();
    let next = engine.add_star("Next", 600.0, 0.0).unwrap();
    engine.connect_stars(far, next).unwrap();
    let us = engine
        .add_observer("Federation", home, ObserverKind::Human, BLUE)
        .unwrap();
    let fleet = engine.spawn_fleet(us, far).unwrap();

    engine.issue_move_order(fleet, far, next, us).unwrap();

    for tick in 1..10 {
        engine.tick().unwrap();
        assert_eq!(
            engine.fleets().nav(fleet).unwrap().docked_at(),
            Some(far),
            "order must not arrive before tick 10 (tick {tick})"
        );
        assert_eq!(count_live(&engine, EventKind::OrderFleetMove), 1);
    }

    engine.tick().unwrap();
    assert_eq!(engine.time().tick, 10);
    assert_eq!(
        engine.fleets().nav(fleet).unwrap(),
        NavState::Travelling {
            source: far,
            destination: next,
            progress: 0.0
        }
    );
    assert_eq!(count_live(&engine, EventKind::OrderFleetMove), 0);
}

#[test]
fn test_order_from_home_star_resolves_on_first_tick() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine
        .issue_move_order(
            cluster.federation_fleet,
            cluster.sol,
            cluster.procyon,
            cluster.federation,
        )
        .unwrap();

    engine.tick().unwrap();
    let nav = engine.fleets().nav(cluster.federation_fleet).unwrap();
    assert_eq!(nav.source(), cluster.sol);
    assert_eq!(nav.destination(), cluster.procyon);

    // The departure happened at the issuer's home: seen the same tick.
    let federation = engine.observer(cluster.federation).unwrap();
    assert!(federation.knows_travelling(cluster.federation_fleet));
    assert_eq!(
        federation.log().last().unwrap().message,
        "Fleet 0 departed Sol for Procyon"
    );
}

// ---- Invalid orders ----

#[test]
fn test_stale_order_is_dropped_once() {
    let mut engine = engine();
    let home = engine.add_star("Home", 500.0, 0.0).unwrap();
    let a = engine.add_star("A", 0.0, 0.0).unwrap();
    let b = engine.add_star("B", 0.0, 100.0).unwrap();
    engine.connect_stars(a, b).unwrap();
    let us = engine
        .add_observer("Federation", home, ObserverKind::Human, BLUE)
        .unwrap();
    let fleet = engine.spawn_fleet(us, a).unwrap();

    engine.issue_move_order(fleet, a, b, us).unwrap();
    engine.issue_move_order(fleet, a, b, us).unwrap();
    tick_n(&mut engine, 10);

    // First order moved the fleet; the second found it gone and vanished.
    assert!(!engine.fleets().nav(fleet).unwrap().is_docked());
    assert_eq!(count_live(&engine, EventKind::OrderFleetMove), 0);
    assert_eq!(count_live(&engine, EventKind::FleetDeparture), 1);
}

#[test]
fn test_order_for_someone_elses_fleet_is_dropped() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine
        .issue_move_order(
            cluster.hegemony_fleet,
            cluster.epsilon_eridani,
            cluster.tau_ceti,
            cluster.federation,
        )
        .unwrap();

    tick_n(&mut engine, 10);
    assert_eq!(
        engine.fleets().nav(cluster.hegemony_fleet).unwrap().docked_at(),
        Some(cluster.epsilon_eridani)
    );
    assert_eq!(count_live(&engine, EventKind::OrderFleetMove), 0);
}

#[test]
fn test_order_for_unknown_fleet_is_dropped() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine
        .issue_move_order(FleetId(99), cluster.sol, cluster.procyon, cluster.federation)
        .unwrap();
    engine.tick().unwrap();
    assert_eq!(count_live(&engine, EventKind::OrderFleetMove), 0);
    assert_eq!(count_live(&engine, EventKind::FleetDeparture), 0);
}

#[test]
fn test_unreachable_destination_changes_nothing() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    let island = engine.add_star("Island", 120.0, 120.0).unwrap();
    engine
        .issue_move_order(
            cluster.federation_fleet,
            cluster.sol,
            island,
            cluster.federation,
        )
        .unwrap();

    engine.tick().unwrap();
    assert_eq!(
        engine.fleets().nav(cluster.federation_fleet).unwrap().docked_at(),
        Some(cluster.sol)
    );
    assert!(engine.fleets().pending_path(cluster.federation_fleet).is_empty());
    assert_eq!(count_live(&engine, EventKind::OrderFleetMove), 0);
    assert_eq!(count_live(&engine, EventKind::FleetDeparture), 0);
}

#[test]
fn test_issue_order_rejects_unknown_ids() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    assert_eq!(
        engine.issue_move_order(cluster.federation_fleet, cluster.sol, StarId(50), cluster.federation),
        Err(SimError::UnknownStar(StarId(50)))
    );
    assert_eq!(
        engine.issue_move_order(cluster.federation_fleet, cluster.sol, cluster.procyon, ObserverId(7)),
        Err(SimError::UnknownObserver(ObserverId(7)))
    );
}

// ---- Movement ----

#[test]
fn test_multi_hop_route_dwells_at_each_star() {
    let mut engine = engine();
    let a = engine.add_star("A", 0.0, 0.0).unwrap();
    let b = engine.add_star("B", 100.0, 0.0).unwrap();
    let c = engine.add_star("C", 200.0, 0.0).unwrap();
    engine.connect_stars(a, b).unwrap();
    engine.connect_stars(b, c).unwrap();
    let us = engine
        .add_observer("Federation", a, ObserverKind::Human, BLUE)
        .unwrap();
    let fleet = engine.spawn_fleet(us, a).unwrap();

    engine.issue_move_order(fleet, a, c, us).unwrap();

    let mut legs: Vec<(StarId, StarId)> = Vec::new();
    for _ in 0..30 {
        engine.tick().unwrap();
        if let NavState::Travelling {
            source,
            destination,
            ..
        } = engine.fleets().nav(fleet).unwrap()
        {
            if legs.last() != Some(&(source, destination)) {
                legs.push((source, destination));
            }
        }
    }

    assert_eq!(legs, vec![(a, b), (b, c)]);
    assert_eq!(engine.fleets().nav(fleet).unwrap().docked_at(), Some(c));

    let log: Vec<String> = engine
        .observer(us)
        .unwrap()
        .log()
        .map(|e| e.message.clone())
        .collect();
    assert_eq!(
        log,
        vec![
            "Fleet 0 departed A for B",
            "Fleet 0 arrived at B",
            "Fleet 0 departed B for C",
            "Fleet 0 arrived at C",
        ]
    );
}

#[test]
fn test_progress_stays_below_one_between_ticks() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine
        .issue_move_order(
            cluster.federation_fleet,
            cluster.sol,
            cluster.lalande,
            cluster.federation,
        )
        .unwrap();

    let mut last = None;
    for _ in 0..40 {
        engine.tick().unwrap();
        let nav = engine.fleets().nav(cluster.federation_fleet).unwrap();
        if let Some(progress) = nav.progress() {
            assert!((0.0..1.0).contains(&progress), "progress {progress}");
            if let Some((leg, prev)) = last {
                if leg == (nav.source(), nav.destination()) {
                    assert!(progress > prev, "progress must increase within a leg");
                }
            }
            last = Some(((nav.source(), nav.destination()), progress));
        }
    }
    assert_eq!(
        engine.fleets().nav(cluster.federation_fleet).unwrap().docked_at(),
        Some(cluster.lalande)
    );
}

#[test]
fn test_travelling_fleet_leaves_a_bounded_trail() {
    let mut engine = SimulationEngine::new(SimConfig {
        fleet_velocity: 0.05,
        trail_length: 4,
        ..Default::default()
    });
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine
        .issue_move_order(
            cluster.federation_fleet,
            cluster.sol,
            cluster.tau_ceti,
            cluster.federation,
        )
        .unwrap();

    tick_n(&mut engine, 8);
    let view = engine.fleets().view(cluster.federation_fleet).unwrap();
    assert_eq!(view.trail.len(), 4);
    assert_eq!(view.trail[0], view.position);
}

// ---- Combat ----

/// Red homed at A, Blue homed at B, X halfway between.
fn standoff() -> (SimulationEngine, StarId, ObserverId, ObserverId) {
    let mut engine = engine();
    let a = engine.add_star("A", 0.0, 0.0).unwrap();
    let x = engine.add_star("X", 100.0, 0.0).unwrap();
    let b = engine.add_star("B", 200.0, 0.0).unwrap();
    engine.connect_stars(a, x).unwrap();
    engine.connect_stars(x, b).unwrap();
    let red = engine
        .add_observer("Red", a, ObserverKind::Human, RED)
        .unwrap();
    let blue = engine
        .add_observer("Blue", b, ObserverKind::Automated, BLUE)
        .unwrap();
    (engine, x, red, blue)
}

#[test]
fn test_simultaneous_arrival_leaves_one_fleet() {
    let (mut engine, x, red, blue) = standoff();
    let a = engine.observer(red).unwrap().home;
    let b = engine.observer(blue).unwrap().home;
    let red_fleet = engine.spawn_fleet(red, a).unwrap();
    let blue_fleet = engine.spawn_fleet(blue, b).unwrap();
    engine.issue_move_order(red_fleet, a, x, red).unwrap();
    engine.issue_move_order(blue_fleet, b, x, blue).unwrap();

    let mut arrival_tick = None;
    for _ in 0..20 {
        engine.tick().unwrap();
        if count_live(&engine, EventKind::CombatReport) > 0 {
            arrival_tick = Some(engine.time().tick);
            break;
        }
    }

    assert_eq!(arrival_tick, Some(5));
    assert_eq!(engine.fleets().docked_at(x), vec![red_fleet]);
    assert!(!engine.fleets().contains(blue_fleet));
    assert_eq!(count_live(&engine, EventKind::CombatReport), 1);
}

#[test]
fn test_resident_holds_against_arrival() {
    let (mut engine, x, red, blue) = standoff();
    let b = engine.observer(blue).unwrap().home;
    // Blue's fleet has the lower id, but Red's is already at X.
    let blue_fleet = engine.spawn_fleet(blue, b).unwrap();
    let red_fleet = engine.spawn_fleet(red, x).unwrap();
    engine.issue_move_order(blue_fleet, b, x, blue).unwrap();

    tick_n(&mut engine, 10);
    assert_eq!(engine.fleets().docked_at(x), vec![red_fleet]);
    assert!(!engine.fleets().contains(blue_fleet));
}

#[test]
fn test_three_owners_one_survivor() {
    let (mut engine, x, red, blue) = standoff();
    let c = engine.add_star("C", 100.0, 100.0).unwrap();
    engine.connect_stars(c, x).unwrap();
    let green = engine
        .add_observer("Green", c, ObserverKind::Automated, [20, 200, 20])
        .unwrap();
    let a = engine.observer(red).unwrap().home;
    let b = engine.observer(blue).unwrap().home;

    let fleets = [
        (engine.spawn_fleet(green, c).unwrap(), green, c),
        (engine.spawn_fleet(blue, b).unwrap(), blue, b),
        (engine.spawn_fleet(red, a).unwrap(), red, a),
    ];
    for (fleet, owner, at) in fleets {
        engine.issue_move_order(fleet, at, x, owner).unwrap();
    }

    tick_n(&mut engine, 10);
    assert_eq!(engine.fleets().docked_at(x), vec![fleets[0].0]);
    assert_eq!(engine.fleets().len(), 1);
}

#[test]
fn test_friendly_fleets_share_a_star() {
    let (mut engine, x, red, _) = standoff();
    let a = engine.observer(red).unwrap().home;
    let first = engine.spawn_fleet(red, x).unwrap();
    let second = engine.spawn_fleet(red, a).unwrap();
    engine.issue_move_order(second, a, x, red).unwrap();

    tick_n(&mut engine, 10);
    assert_eq!(engine.fleets().docked_at(x), vec![first, second]);
    assert_eq!(count_live(&engine, EventKind::CombatReport), 0);
}

// ---- Delivery ----

#[test]
fn test_foreign_movement_is_seen_late() {
    let mut engine = engine();
    let home = engine.add_star("Home", 400.0, 0.0).unwrap();
    let e = engine.add_star("E", 0.0, 0.0).unwrap();
    let f = engine.add_star("F", 0.0, 100.0).unwrap();
    engine.connect_stars(e, f).unwrap();
    let us = engine
        .add_observer("Federation", home, ObserverKind::Human, BLUE)
        .unwrap();
    let them = engine
        .add_observer("Hegemony", e, ObserverKind::Automated, RED)
        .unwrap();
    let fleet = engine.spawn_fleet(them, e).unwrap();
    engine.issue_move_order(fleet, e, f, them).unwrap();

    tick_n(&mut engine, 8);
    let federation = engine.observer(us).unwrap();
    assert!(!federation.knows_travelling(fleet));
    assert!(!federation.knows_idle(fleet));

    engine.tick().unwrap();
    // Tick 9: the departure reaches us, though the fleet docked at tick 5.
    let federation = engine.observer(us).unwrap();
    assert!(federation.knows_travelling(fleet));
    assert_eq!(engine.fleets().nav(fleet).unwrap().docked_at(), Some(f));

    tick_n(&mut engine, 4);
    assert!(engine.observer(us).unwrap().knows_travelling(fleet));

    engine.tick().unwrap();
    let federation = engine.observer(us).unwrap();
    assert!(federation.knows_idle(fleet));
    assert!(!federation.knows_travelling(fleet));
}

#[test]
fn test_broadcast_lives_until_every_observer_has_it() {
    let mut engine = engine();
    let near = engine.add_star("Near", 0.0, 0.0).unwrap();
    let next = engine.add_star("Next", 0.0, 100.0).unwrap();
    let far = engine.add_star("Far", 1000.0, 0.0).unwrap();
    engine.connect_stars(near, next).unwrap();
    let us = engine
        .add_observer("Near", near, ObserverKind::Human, BLUE)
        .unwrap();
    let them = engine
        .add_observer("Far", far, ObserverKind::Automated, RED)
        .unwrap();
    let fleet = engine.spawn_fleet(us, near).unwrap();
    engine.issue_move_order(fleet, near, next, us).unwrap();

    engine.tick().unwrap();
    let departure = engine
        .events()
        .iter()
        .find(|e| e.kind() == EventKind::FleetDeparture)
        .unwrap();
    let departure_id = departure.id;
    assert!(departure.delivered_to.contains(&us));
    assert!(!departure.delivered_to.contains(&them));

    // The departure is 1000 away from Far: delivered after 20 more ticks.
    tick_n(&mut engine, 19);
    assert!(engine.events().iter().any(|e| e.id == departure_id));
    assert!(!engine.observer(them).unwrap().has_seen(departure_id));

    engine.tick().unwrap();
    assert!(engine.observer(them).unwrap().has_seen(departure_id));
    assert!(!engine.events().iter().any(|e| e.id == departure_id));
}

#[test]
fn test_log_holds_only_recent_lines() {
    let mut engine = SimulationEngine::new(SimConfig {
        message_log_capacity: 2,
        ..Default::default()
    });
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine
        .issue_move_order(
            cluster.federation_fleet,
            cluster.sol,
            cluster.lalande,
            cluster.federation,
        )
        .unwrap();
    tick_n(&mut engine, 40);

    let log: Vec<String> = engine
        .observer(cluster.federation)
        .unwrap()
        .log()
        .map(|e| e.message.clone())
        .collect();
    assert_eq!(
        log,
        vec!["Fleet 0 departed Tau Ceti for Lalande", "Fleet 0 arrived at Lalande"]
    );
}

#[test]
fn test_fast_fleet_news_arriving_out_of_order() {
    let mut engine = SimulationEngine::new(SimConfig {
        fleet_velocity: 4.0,
        ..Default::default()
    });
    let a = engine.add_star("A", 0.0, 0.0).unwrap();
    let c = engine.add_star("C", 100.0, 0.0).unwrap();
    let home = engine.add_star("H", 200.0, 0.0).unwrap();
    engine.connect_stars(a, c).unwrap();
    let us = engine
        .add_observer("Federation", home, ObserverKind::Human, BLUE)
        .unwrap();
    let fleet = engine.spawn_fleet(us, a).unwrap();
    engine.issue_move_order(fleet, a, c, us).unwrap();

    tick_n(&mut engine, 30);
    assert_eq!(engine.fleets().nav(fleet).unwrap().docked_at(), Some(c));

    // The arrival at C is closer to H than the departure from A.
    let federation = engine.observer(us).unwrap();
    let log: Vec<(u64, String)> = federation
        .log()
        .map(|e| (e.tick, e.message.clone()))
        .collect();
    assert_eq!(
        log,
        vec![
            (7, "Fleet 0 arrived at C".to_string()),
            (8, "Fleet 0 departed A for C".to_string()),
        ]
    );
    assert!(federation.knows_idle(fleet));
    assert!(!federation.knows_travelling(fleet));
}

// ---- World editing ----

#[test]
fn test_spawn_beside_hostile_fleet_is_rejected() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();

    assert_eq!(
        engine.spawn_fleet(cluster.hegemony, cluster.sol),
        Err(SimError::StarContested(cluster.sol))
    );
    assert_eq!(engine.fleets().len(), 2);

    let reinforcement = engine.spawn_fleet(cluster.federation, cluster.sol).unwrap();
    assert_eq!(
        engine.fleets().docked_at(cluster.sol),
        vec![cluster.federation_fleet, reinforcement]
    );
    assert!(engine.spawn_fleet(cluster.hegemony, cluster.procyon).is_ok());
}

#[test]
fn test_world_edits_apply_between_ticks() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine.connect_stars(cluster.sol, cluster.lalande).unwrap();
    engine.relocate_star(cluster.lalande, 60.0, 340.0).unwrap();
    engine.set_star_owner(cluster.lalande, None).unwrap();

    let lalande = engine.graph().star(cluster.lalande).unwrap();
    assert!(lalande.is_adjacent(cluster.sol));
    assert_eq!(lalande.position, glam::DVec2::new(60.0, 340.0));
    assert_eq!(lalande.owner, None);
    assert_eq!(
        engine.relocate_star(StarId(40), 0.0, 0.0),
        Err(SimError::UnknownStar(StarId(40)))
    );
    engine.tick().unwrap();
}

#[test]
fn test_empty_world_ticks() {
    let mut engine = engine();
    tick_n(&mut engine, 5);
    assert_eq!(engine.time().tick, 5);
    assert!(engine.events().is_empty());
}

#[test]
fn test_new_star_reaches_every_chart() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    let barnard = engine.add_star("Barnard", 400.0, 400.0).unwrap();
    for observer in engine.observers() {
        assert!(observer.known_star(barnard).is_some());
    }
    assert_eq!(
        engine.add_star("Sol", 0.0, 0.0),
        Err(SimError::DuplicateStarName("Sol".into()))
    );
    assert_eq!(
        engine.observer(cluster.hegemony).unwrap().known_stars().count(),
        6
    );
}

#[test]
fn test_observer_claims_home_star() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    assert_eq!(
        engine.graph().star(cluster.sol).unwrap().owner,
        Some(cluster.federation)
    );
    let chart = engine.observer(cluster.federation).unwrap();
    assert_eq!(
        chart.known_star(cluster.epsilon_eridani).unwrap().owner,
        Some(cluster.hegemony)
    );
    assert!(chart.knows_idle(cluster.federation_fleet));
    assert!(!chart.knows_idle(cluster.hegemony_fleet));
}

#[test]
fn test_set_star_owner_validates_observer() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine
        .set_star_owner(cluster.tau_ceti, Some(cluster.hegemony))
        .unwrap();
    assert_eq!(
        engine.graph().star(cluster.tau_ceti).unwrap().owner,
        Some(cluster.hegemony)
    );
    assert_eq!(
        engine.set_star_owner(cluster.tau_ceti, Some(ObserverId(9))),
        Err(SimError::UnknownObserver(ObserverId(9)))
    );
}

#[test]
fn test_relocating_home_star_changes_latency() {
    let mut engine = engine();
    let home = engine.add_star("Home", 0.0, 0.0).unwrap();
    let far = engine.add_star("Far", 500.0, 0.0).unwrap();
    let next = engine.add_star("Next", 500.0, 100.0).unwrap();
    engine.connect_stars(far, next).unwrap();
    let us = engine
        .add_observer("Federation", home, ObserverKind::Human, BLUE)
        .unwrap();
    let fleet = engine.spawn_fleet(us, far).unwrap();

    // Due orders are checked against where `from` is now.
    engine.issue_move_order(fleet, far, next, us).unwrap();
    engine.relocate_star(far, 100.0, 0.0).unwrap();
    tick_n(&mut engine, 2);
    assert!(!engine.fleets().nav(fleet).unwrap().is_docked());
}

#[test]
fn test_execute_dispatches_commands() {
    let mut engine = engine();
    let CommandOutcome::StarAdded(a) = engine
        .execute(Command::AddStar {
            name: "A".into(),
            x: 0.0,
            y: 0.0,
        })
        .unwrap()
    else {
        panic!("expected a star");
    };
    let CommandOutcome::StarAdded(b) = engine
        .execute(Command::AddStar {
            name: "B".into(),
            x: 50.0,
            y: 0.0,
        })
        .unwrap()
    else {
        panic!("expected a star");
    };
    assert_eq!(
        engine.execute(Command::ConnectStars { a, b }).unwrap(),
        CommandOutcome::Applied
    );
    let CommandOutcome::ObserverAdded(us) = engine
        .execute(Command::AddObserver {
            name: "Federation".into(),
            home: a,
            kind: ObserverKind::Human,
            color: BLUE,
        })
        .unwrap()
    else {
        panic!("expected an observer");
    };
    let CommandOutcome::FleetSpawned(fleet) = engine
        .execute(Command::SpawnFleet { owner: us, at: a })
        .unwrap()
    else {
        panic!("expected a fleet");
    };
    assert!(matches!(
        engine
            .execute(Command::MoveFleet {
                fleet,
                from: a,
                to: b,
                by: us
            })
            .unwrap(),
        CommandOutcome::OrderQueued(_)
    ));
    assert_eq!(
        engine.execute(Command::ConnectStars { a, b: a }),
        Err(SimError::SelfLoop(a))
    );

    tick_n(&mut engine, 5);
    assert_eq!(engine.fleets().nav(fleet).unwrap().docked_at(), Some(b));
}

#[test]
fn test_force_move_rejects_travelling_fleet() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine
        .force_move(cluster.federation_fleet, cluster.tau_ceti)
        .unwrap();
    assert_eq!(
        engine.force_move(cluster.federation_fleet, cluster.procyon),
        Err(SimError::FleetNotDocked(cluster.federation_fleet))
    );
}

// ---- Snapshots & determinism ----

#[test]
fn test_snapshot_reports_wavefronts() {
    let mut engine = engine();
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    engine
        .issue_move_order(
            cluster.hegemony_fleet,
            cluster.epsilon_eridani,
            cluster.tau_ceti,
            cluster.hegemony,
        )
        .unwrap();
    tick_n(&mut engine, 3);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.time.tick, 3);
    assert_eq!(snapshot.stars.len(), 5);
    assert_eq!(snapshot.fleets.len(), 2);
    assert_eq!(snapshot.observers.len(), 2);
    let departure = snapshot
        .events
        .iter()
        .find(|e| e.kind == EventKind::FleetDeparture)
        .unwrap();
    assert_eq!(departure.age, 2);
    assert_eq!(departure.radius, 100.0);
    assert_eq!(departure.target, None);
}

fn scripted_run(seed: u64) -> Vec<String> {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    let cluster = world_setup::setup_local_cluster(&mut engine).unwrap();
    world_setup::generate_cluster(&mut engine, 12).unwrap();
    engine
        .issue_move_order(
            cluster.federation_fleet,
            cluster.sol,
            cluster.epsilon_eridani,
            cluster.federation,
        )
        .unwrap();
    engine
        .issue_move_order(
            cluster.hegemony_fleet,
            cluster.epsilon_eridani,
            cluster.sol,
            cluster.hegemony,
        )
        .unwrap();

    (0..60)
        .map(|_| {
            engine.tick().unwrap();
            serde_json::to_string(&engine.snapshot()).unwrap()
        })
        .collect()
}

#[test]
fn test_determinism_same_seed() {
    assert_eq!(scripted_run(7), scripted_run(7));
}

#[test]
fn test_generated_cluster_differs_by_seed() {
    let mut a = SimulationEngine::new(SimConfig {
        seed: 1,
        ..Default::default()
    });
    let mut b = SimulationEngine::new(SimConfig {
        seed: 2,
        ..Default::default()
    });
    world_setup::generate_cluster(&mut a, 10).unwrap();
    world_setup::generate_cluster(&mut b, 10).unwrap();
    let pa: Vec<_> = a.graph().stars().iter().map(|s| s.position).collect();
    let pb: Vec<_> = b.graph().stars().iter().map(|s| s.position).collect();
    assert_ne!(pa, pb);
}

#[test]
fn test_generated_cluster_is_connected_and_named_uniquely() {
    let mut engine = engine();
    world_setup::setup_local_cluster(&mut engine).unwrap();
    let ids = world_setup::generate_cluster(&mut engine, 40).unwrap();
    assert_eq!(ids.len(), 40);

    for &id in &ids[1..] {
        assert!(!engine.graph().shortest_path(ids[0], id).is_empty());
    }
    let mut names: Vec<_> = engine.graph().stars().iter().map(|s| s.name.clone()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 45);
}
