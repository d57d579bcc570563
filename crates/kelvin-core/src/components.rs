//! Entity data: the canonical star record and the fleet components stored
//! in the fleet registry's ECS world.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::types::{FleetId, ObserverId, StarId};

/// A star system. Owned by the navigation graph; observers hold clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: StarId,
    pub name: String,
    pub position: DVec2,
    /// Adjacent stars in the order the lanes were added.
    pub neighbors: Vec<StarId>,
    pub owner: Option<ObserverId>,
}

impl Star {
    pub fn new(id: StarId, name: impl Into<String>, position: DVec2) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            neighbors: Vec::new(),
            owner: None,
        }
    }

    pub fn is_adjacent(&self, other: StarId) -> bool {
        self.neighbors.contains(&other)
    }
}

/// Identity tag of a fleet entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetTag {
    pub id: FleetId,
}

/// Observer that commands a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner(pub ObserverId);

/// Fleet navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum NavState {
    /// Resident at a star since the given tick.
    Docked { at: StarId, since: u64 },
    /// On a single-hop leg. `progress` is in [0, 1).
    Travelling {
        source: StarId,
        destination: StarId,
        progress: f64,
    },
}

impl NavState {
    /// Star the fleet is at or leaving from.
    pub fn source(&self) -> StarId {
        match *self {
            NavState::Docked { at, .. } => at,
            NavState::Travelling { source, .. } => source,
        }
    }

    /// Star the fleet is heading to. Equal to `source` while docked.
    pub fn destination(&self) -> StarId {
        match *self {
            NavState::Docked { at, .. } => at,
            NavState::Travelling { destination, .. } => destination,
        }
    }

    /// Leg progress, or `None` while docked.
    pub fn progress(&self) -> Option<f64> {
        match *self {
            NavState::Docked { .. } => None,
            NavState::Travelling { progress, .. } => Some(progress),
        }
    }

    pub fn docked_at(&self) -> Option<StarId> {
        match *self {
            NavState::Docked { at, .. } => Some(at),
            NavState::Travelling { .. } => None,
        }
    }

    pub fn is_docked(&self) -> bool {
        matches!(self, NavState::Docked { .. })
    }
}

/// Interpolated position and speed (fraction of the propagation speed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub position: DVec2,
    pub velocity: f64,
}

/// Hops still to traverse after the current leg, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightPlan {
    pub hops: VecDeque<StarId>,
}

impl FlightPlan {
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

/// Recent positions for trail rendering, newest first. Presentation only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub points: Vec<DVec2>,
}
