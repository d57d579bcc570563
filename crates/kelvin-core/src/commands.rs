//! Commands from outside the core.
//!
//! World edits apply immediately between ticks. Move orders never do: they
//! become `OrderFleetMove` events and take effect when they arrive.

use serde::{Deserialize, Serialize};

use crate::enums::ObserverKind;
use crate::types::{EventId, FleetId, ObserverId, StarId};

/// All external entry points, as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Send `fleet`, believed docked at `from`, to `to` on behalf of `by`.
    MoveFleet {
        fleet: FleetId,
        from: StarId,
        to: StarId,
        by: ObserverId,
    },
    AddStar {
        name: String,
        x: f64,
        y: f64,
    },
    ConnectStars {
        a: StarId,
        b: StarId,
    },
    RelocateStar {
        star: StarId,
        x: f64,
        y: f64,
    },
    SetStarOwner {
        star: StarId,
        owner: Option<ObserverId>,
    },
    AddObserver {
        name: String,
        home: StarId,
        kind: ObserverKind,
        color: [u8; 3],
    },
    SpawnFleet {
        owner: ObserverId,
        at: StarId,
    },
}

/// What a command produced, when it produced something addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    OrderQueued(EventId),
    StarAdded(StarId),
    ObserverAdded(ObserverId),
    FleetSpawned(FleetId),
    Applied,
}
