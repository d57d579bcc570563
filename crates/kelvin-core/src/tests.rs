use glam::DVec2;

use crate::commands::Command;
use crate::components::{NavState, Star};
use crate::enums::EventKind;
use crate::error::SimError;
use crate::events::{EventPayload, FleetSnapshot, ObservableEvent};
use crate::types::{EventId, FleetId, ObserverId, SimTime, StarId};

fn fleet_snapshot() -> FleetSnapshot {
    FleetSnapshot {
        id: FleetId(3),
        owner: ObserverId(1),
        position: DVec2::new(10.0, 20.0),
        nav: NavState::Travelling {
            source: StarId(0),
            destination: StarId(1),
            progress: 0.25,
        },
        velocity: 0.5,
    }
}

#[test]
fn test_nav_state_docked_has_equal_endpoints() {
    let nav = NavState::Docked {
        at: StarId(4),
        since: 7,
    };
    assert_eq!(nav.source(), nav.destination());
    assert_eq!(nav.progress(), None);
    assert_eq!(nav.docked_at(), Some(StarId(4)));
}

#[test]
fn test_nav_state_travelling_accessors() {
    let nav = fleet_snapshot().nav;
    assert_eq!(nav.source(), StarId(0));
    assert_eq!(nav.destination(), StarId(1));
    assert_eq!(nav.progress(), Some(0.25));
    assert!(!nav.is_docked());
}

#[test]
fn test_event_radius_grows_with_age() {
    let mut event = ObservableEvent::new(
        EventId(0),
        DVec2::ZERO,
        EventPayload::OrderFleetMove {
            fleet: FleetId(0),
            from: StarId(0),
            to: StarId(1),
            by: ObserverId(0),
        },
    );
    assert_eq!(event.radius(50.0), 0.0);
    event.t = 4;
    assert_eq!(event.radius(50.0), 200.0);
}

#[test]
fn test_event_reach_is_inclusive() {
    let mut event = ObservableEvent::new(
        EventId(1),
        DVec2::new(0.0, 0.0),
        EventPayload::FleetArrival {
            fleet: fleet_snapshot(),
            star: Star::new(StarId(1), "Procyon", DVec2::ZERO),
        },
    );
    let target = DVec2::new(300.0, 400.0);
    event.t = 9;
    assert!(!event.reaches(target, 50.0));
    event.t = 10;
    assert!(event.reaches(target, 50.0));
    event.t = 11;
    assert!(event.reaches(target, 50.0));
}

#[test]
fn test_event_kind_broadcast_split() {
    assert!(EventKind::FleetDeparture.is_broadcast());
    assert!(EventKind::FleetArrival.is_broadcast());
    assert!(EventKind::CombatReport.is_broadcast());
    assert!(!EventKind::OrderFleetMove.is_broadcast());
}

#[test]
fn test_command_serde_uses_type_tag() {
    let cmd = Command::MoveFleet {
        fleet: FleetId(2),
        from: StarId(0),
        to: StarId(3),
        by: ObserverId(1),
    };
    let json = serde_json::to_string(&cmd).unwrap();
    assert!(json.contains("\"type\":\"MoveFleet\""), "got {json}");
    let back: Command = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cmd);
}

#[test]
fn test_payload_serde_round_trip() {
    let payload = EventPayload::CombatReport {
        star: Star::new(StarId(2), "Tau Ceti", DVec2::new(200.0, 150.0)),
        destroyed: fleet_snapshot(),
        victor: fleet_snapshot(),
    };
    let json = serde_json::to_string(&payload).unwrap();
    let back: EventPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(back, payload);
    assert_eq!(back.kind(), EventKind::CombatReport);
}

#[test]
fn test_sim_time_advance() {
    let mut time = SimTime::default();
    time.advance();
    time.advance();
    assert_eq!(time.tick, 2);
}

#[test]
fn test_error_messages() {
    assert_eq!(SimError::UnknownStar(StarId(9)).to_string(), "unknown star: star#9");
    let err = SimError::InconsistentSnapshot {
        observer: ObserverId(1),
        star: StarId(2),
    };
    assert_eq!(err.to_string(), "observer observer#1 has no record of star#2");
    assert_eq!(
        SimError::StarContested(StarId(3)).to_string(),
        "star#3 is held by another observer's fleet"
    );
}
