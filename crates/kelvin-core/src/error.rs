//! Error type for simulation commands and invariant violations.
//!
//! Declared soft failures (an order that no longer applies, an unreachable
//! destination) are not errors; they are logged and change nothing.

use thiserror::Error;

use crate::types::{FleetId, ObserverId, StarId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("unknown star: {0}")]
    UnknownStar(StarId),

    #[error("unknown fleet: {0}")]
    UnknownFleet(FleetId),

    #[error("unknown observer: {0}")]
    UnknownObserver(ObserverId),

    #[error("a star named {0:?} already exists")]
    DuplicateStarName(String),

    #[error("cannot connect {0} to itself")]
    SelfLoop(StarId),

    #[error("fleet {0} is not docked")]
    FleetNotDocked(FleetId),

    /// Another observer's fleet is docked at the star.
    #[error("{0} is held by another observer's fleet")]
    StarContested(StarId),

    /// An observer snapshot is missing a star it must contain. Fatal.
    #[error("observer {observer} has no record of {star}")]
    InconsistentSnapshot { observer: ObserverId, star: StarId },
}

pub type SimResult<T> = std::result::Result<T, SimError>;
