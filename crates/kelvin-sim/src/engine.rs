//! Simulation engine: the single entry point for drivers.
//!
//! `SimulationEngine` owns the star graph, the fleet registry, the event
//! queue and the observers. `tick()` advances everything one step in a
//! fixed order; between ticks drivers may edit the world, issue orders and
//! read state. Completely headless and deterministic.

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use kelvin_core::commands::{Command, CommandOutcome};
use kelvin_core::constants::*;
use kelvin_core::enums::ObserverKind;
use kelvin_core::events::{EventPayload, ObservableEvent};
use kelvin_core::state::{ObserverView, WorldSnapshot};
use kelvin_core::types::{EventId, FleetId, ObserverId, SimTime, StarId};
use kelvin_core::{SimError, SimResult};

use crate::director::ObservationDirector;
use crate::fleets::FleetRegistry;
use crate::graph::NavigationGraph;
use crate::observer::Observer;
use crate::propagation::EventPropagation;
use crate::systems;

/// Configuration for a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for world generation. Same seed = same generated cluster.
    pub seed: u64,
    /// Distance an event's wavefront travels per tick.
    pub propagation_speed: f64,
    /// Speed of newly spawned fleets, as a fraction of `propagation_speed`.
    pub fleet_velocity: f64,
    /// Lines kept in each human observer's message log.
    pub message_log_capacity: usize,
    /// Trail points kept per travelling fleet.
    pub trail_length: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            propagation_speed: PROPAGATION_SPEED,
            fleet_velocity: DEFAULT_FLEET_VELOCITY,
            message_log_capacity: MESSAGE_LOG_CAPACITY,
            trail_length: TRAIL_LENGTH,
        }
    }
}

pub struct SimulationEngine {
    graph: NavigationGraph,
    fleets: FleetRegistry,
    propagation: EventPropagation,
    director: ObservationDirector,
    time: SimTime,
    rng: ChaCha8Rng,
    config: SimConfig,
}

impl SimulationEngine {
    /// Create an empty galaxy with the given config.
    pub fn new(mut config: SimConfig) -> Self {
        config.propagation_speed = config.propagation_speed.max(MIN_SPEED);
        config.fleet_velocity = config.fleet_velocity.max(MIN_SPEED);
        Self {
            graph: NavigationGraph::new(),
            fleets: FleetRegistry::new(),
            propagation: EventPropagation::new(config.propagation_speed),
            director: ObservationDirector::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// Order: movement, combat at stars where fleets docked, path
    /// continuation for survivors, event propagation and delivery, then
    /// commit of the events emitted during the tick.
    ///
    /// Observer charts are checked before anything moves. An
    /// `InconsistentSnapshot` error from that check leaves the engine
    /// exactly as it was.
    pub fn tick(&mut self) -> SimResult<()> {
        self.director.verify_charts(&self.graph)?;
        let tick = self.time.tick + 1;

        let arrived = systems::movement::run(
            &mut self.fleets,
            &self.graph,
            &mut self.propagation,
            tick,
            self.config.trail_length,
        );
        systems::combat::run(
            &arrived,
            &mut self.fleets,
            &self.graph,
            &mut self.propagation,
        );
        systems::movement::continue_paths(
            &arrived,
            &mut self.fleets,
            &self.graph,
            &mut self.propagation,
        );
        self.director
            .update(&mut self.propagation, &mut self.fleets, &self.graph, tick)?;
        self.propagation.commit();

        self.time.advance();
        trace!(
            tick,
            fleets = self.fleets.len(),
            events = self.propagation.live().len(),
            "tick complete"
        );
        Ok(())
    }

    /// Send a move order from `by`'s home star toward `from`.
    ///
    /// Nothing moves now. The order travels at the propagation speed and is
    /// checked against the fleet's actual state when it arrives.
    pub fn issue_move_order(
        &mut self,
        fleet: FleetId,
        from: StarId,
        to: StarId,
        by: ObserverId,
    ) -> SimResult<EventId> {
        let home = self.director.try_observer(by)?.home;
        let anchor = self.graph.try_star(home)?.position;
        self.graph.try_star(from)?;
        self.graph.try_star(to)?;
        Ok(self.propagation.push_live(
            anchor,
            EventPayload::OrderFleetMove { fleet, from, to, by },
        ))
    }

    /// Add a star. Every observer's chart gains it.
    pub fn add_star(&mut self, name: &str, x: f64, y: f64) -> SimResult<StarId> {
        let id = self.graph.add_star(name, DVec2::new(x, y))?;
        let star = self.graph.try_star(id)?;
        self.director.chart_star(star);
        info!(star = %name, x, y, "star added");
        Ok(id)
    }

    pub fn connect_stars(&mut self, a: StarId, b: StarId) -> SimResult<()> {
        self.graph.add_edge(a, b)?;
        info!(a = %a, b = %b, "stars connected");
        Ok(())
    }

    pub fn relocate_star(&mut self, star: StarId, x: f64, y: f64) -> SimResult<()> {
        self.graph.relocate(star, DVec2::new(x, y))?;
        info!(star = %star, x, y, "star relocated");
        Ok(())
    }

    pub fn set_star_owner(&mut self, star: StarId, owner: Option<ObserverId>) -> SimResult<()> {
        if let Some(owner) = owner {
            self.director.try_observer(owner)?;
        }
        self.graph.set_owner(star, owner)?;
        info!(star = %star, owner = ?owner, "star owner set");
        Ok(())
    }

    /// Add an observer homed at `home`, which it claims.
    pub fn add_observer(
        &mut self,
        name: &str,
        home: StarId,
        kind: ObserverKind,
        color: [u8; 3],
    ) -> SimResult<ObserverId> {
        self.graph.try_star(home)?;
        let id = self.director.add_observer(
            name,
            kind,
            home,
            color,
            self.graph.stars(),
            self.config.message_log_capacity,
        );
        self.graph.set_owner(home, Some(id))?;
        let claimed = self.graph.try_star(home)?.clone();
        self.director.chart_star(&claimed);
        info!(observer = %name, home = %claimed.name, "observer added");
        Ok(id)
    }

    /// Spawn a docked fleet. Its owner knows about it at once.
    ///
    /// Rejected with `StarContested` if another observer's fleet is docked
    /// at `at`; combat only runs where fleets arrive.
    pub fn spawn_fleet(&mut self, owner: ObserverId, at: StarId) -> SimResult<FleetId> {
        self.director.try_observer(owner)?;
        let star = self.graph.try_star(at)?;
        let hostile = self
            .fleets
            .docked_at(at)
            .into_iter()
            .any(|id| self.fleets.owner(id) != Some(owner));
        if hostile {
            return Err(SimError::StarContested(at));
        }
        let id = self
            .fleets
            .spawn(owner, star, self.config.fleet_velocity, self.time.tick);
        if let Some(snapshot) = self.fleets.snapshot(id) {
            self.director.brief_owner(snapshot);
        }
        Ok(id)
    }

    /// Apply a command given as data.
    pub fn execute(&mut self, command: Command) -> SimResult<CommandOutcome> {
        match command {
            Command::MoveFleet { fleet, from, to, by } => self
                .issue_move_order(fleet, from, to, by)
                .map(CommandOutcome::OrderQueued),
            Command::AddStar { name, x, y } => {
                self.add_star(&name, x, y).map(CommandOutcome::StarAdded)
            }
            Command::ConnectStars { a, b } => {
                self.connect_stars(a, b).map(|_| CommandOutcome::Applied)
            }
            Command::RelocateStar { star, x, y } => self
                .relocate_star(star, x, y)
                .map(|_| CommandOutcome::Applied),
            Command::SetStarOwner { star, owner } => self
                .set_star_owner(star, owner)
                .map(|_| CommandOutcome::Applied),
            Command::AddObserver {
                name,
                home,
                kind,
                color,
            } => self
                .add_observer(&name, home, kind, color)
                .map(CommandOutcome::ObserverAdded),
            Command::SpawnFleet { owner, at } => self
                .spawn_fleet(owner, at)
                .map(CommandOutcome::FleetSpawned),
        }
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn graph(&self) -> &NavigationGraph {
        &self.graph
    }

    pub fn fleets(&self) -> &FleetRegistry {
        &self.fleets
    }

    /// Live events, for drawing wavefronts.
    pub fn events(&self) -> &[ObservableEvent] {
        self.propagation.live()
    }

    pub fn observer(&self, id: ObserverId) -> Option<&Observer> {
        self.director.observer(id)
    }

    pub fn observers(&self) -> impl Iterator<Item = &Observer> {
        self.director.observers()
    }

    pub fn observer_view(&self, id: ObserverId) -> SimResult<ObserverView> {
        self.director.try_observer(id).map(Observer::view)
    }

    /// Build the complete readable state.
    pub fn snapshot(&self) -> WorldSnapshot {
        systems::snapshot::build_snapshot(
            self.time,
            &self.graph,
            &self.fleets,
            &self.propagation,
            &self.director,
        )
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Move a fleet immediately, bypassing order latency (for tests).
    #[cfg(test)]
    pub(crate) fn force_move(&mut self, fleet: FleetId, to: StarId) -> SimResult<()> {
        if let Some(leg) = self.fleets.move_to(fleet, to, &self.graph)? {
            if let Some((anchor, payload)) =
                systems::movement::departure(&self.fleets, &self.graph, &leg)
            {
                self.propagation.push_live(anchor, payload);
            }
        }
        Ok(())
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
