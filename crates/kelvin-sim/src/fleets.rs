//! Fleet registry: owns every fleet as an entity in a hecs world.
//!
//! Fleets are addressed by `FleetId`. The id index is a `BTreeMap`, so every
//! per-tick pass visits fleets in ascending id order regardless of how hecs
//! lays out its archetypes.

use std::collections::{BTreeMap, VecDeque};

use hecs::{Entity, World};
use tracing::debug;

use kelvin_core::components::{FleetTag, FlightPlan, Motion, NavState, Owner, Star, Trail};
use kelvin_core::events::FleetSnapshot;
use kelvin_core::state::FleetView;
use kelvin_core::types::{FleetId, ObserverId, StarId};
use kelvin_core::{SimError, SimResult};

use crate::graph::NavigationGraph;

/// A single-hop leg a fleet has just started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub fleet: FleetId,
    pub from: StarId,
    pub to: StarId,
}

pub struct FleetRegistry {
    world: World,
    index: BTreeMap<FleetId, Entity>,
    next_id: u32,
}

impl Default for FleetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            index: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Spawn a fleet docked at `at`.
    pub fn spawn(&mut self, owner: ObserverId, at: &Star, velocity: f64, tick: u64) -> FleetId {
        let id = FleetId(self.next_id);
        self.next_id += 1;
        let entity = self.world.spawn((
            FleetTag { id },
            Owner(owner),
            NavState::Docked { at: at.id, since: tick },
            Motion {
                position: at.position,
                velocity,
            },
            FlightPlan::default(),
            Trail::default(),
        ));
        self.index.insert(id, entity);
        id
    }

    /// Remove a fleet. Returns whether it existed.
    pub fn despawn(&mut self, id: FleetId) -> bool {
        match self.index.remove(&id) {
            Some(entity) => self.world.despawn(entity).is_ok(),
            None => false,
        }
    }

    pub fn contains(&self, id: FleetId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Fleet ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = FleetId> + '_ {
        self.index.keys().copied()
    }

    pub fn nav(&self, id: FleetId) -> Option<NavState> {
        let entity = *self.index.get(&id)?;
        self.world.get::<&NavState>(entity).ok().map(|nav| *nav)
    }

    pub fn owner(&self, id: FleetId) -> Option<ObserverId> {
        let entity = *self.index.get(&id)?;
        self.world.get::<&Owner>(entity).ok().map(|owner| owner.0)
    }

    /// Hops left after the current leg.
    pub fn pending_path(&self, id: FleetId) -> Vec<StarId> {
        self.index
            .get(&id)
            .and_then(|&entity| self.world.get::<&FlightPlan>(entity).ok())
            .map(|plan| plan.hops.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The fleet as an observer would record it right now.
    pub fn snapshot(&self, id: FleetId) -> Option<FleetSnapshot> {
        let entity = *self.index.get(&id)?;
        let mut query = self
            .world
            .query_one::<(&Owner, &NavState, &Motion)>(entity)
            .ok()?;
        let (owner, nav, motion) = query.get()?;
        Some(FleetSnapshot {
            id,
            owner: owner.0,
            position: motion.position,
            nav: *nav,
            velocity: motion.velocity,
        })
    }

    pub fn view(&self, id: FleetId) -> Option<FleetView> {
        let entity = *self.index.get(&id)?;
        let mut query = self
            .world
            .query_one::<(&Owner, &NavState, &Motion, &FlightPlan, &Trail)>(entity)
            .ok()?;
        let (owner, nav, motion, plan, trail) = query.get()?;
        Some(FleetView {
            id,
            owner: owner.0,
            position: motion.position,
            velocity: motion.velocity,
            nav: *nav,
            path: plan.hops.iter().copied().collect(),
            trail: trail.points.clone(),
        })
    }

    /// Fleets docked at `star`, ascending by id.
    pub fn docked_at(&self, star: StarId) -> Vec<FleetId> {
        self.ids()
            .filter(|&id| self.nav(id).and_then(|nav| nav.docked_at()) == Some(star))
            .collect()
    }

    /// Send a docked fleet toward `target`.
    ///
    /// Adjacent targets are reached in one leg; anything else is routed with
    /// `shortest_path` and the remaining hops stored in the flight plan.
    /// Returns `Ok(None)` when the target is the current star or
    /// unreachable; neither changes any state.
    pub fn move_to(
        &mut self,
        id: FleetId,
        target: StarId,
        graph: &NavigationGraph,
    ) -> SimResult<Option<Leg>> {
        let nav = self.nav(id).ok_or(SimError::UnknownFleet(id))?;
        let current = nav.docked_at().ok_or(SimError::FleetNotDocked(id))?;
        if current == target {
            debug!(fleet = %id, star = %target, "move ignored: already there");
            return Ok(None);
        }

        let mut hops: VecDeque<StarId> = if graph.are_adjacent(current, target) {
            VecDeque::from([target])
        } else {
            let path = graph.shortest_path(current, target);
            if path.is_empty() {
                debug!(fleet = %id, from = %current, to = %target, "move ignored: unreachable");
                return Ok(None);
            }
            path.into_iter().skip(1).collect()
        };

        let Some(next) = hops.pop_front() else {
            return Ok(None);
        };
        self.set_plan(id, hops);
        Ok(self.begin_leg(id, current, next))
    }

    /// Start the next hop of a docked fleet's flight plan, if any.
    pub fn continue_path(&mut self, id: FleetId) -> Option<Leg> {
        let entity = *self.index.get(&id)?;
        let (current, next) = {
            let (nav, plan) = self
                .world
                .query_one_mut::<(&NavState, &mut FlightPlan)>(entity)
                .ok()?;
            let current = nav.docked_at()?;
            (current, plan.hops.pop_front()?)
        };
        self.begin_leg(id, current, next)
    }

    /// Advance every travelling fleet by one tick.
    ///
    /// Progress grows by `velocity * c / leg length`. A fleet whose progress
    /// would reach 1 snaps to its destination and docks instead. Returns the
    /// fleets that docked this tick, ascending by id.
    pub fn update(
        &mut self,
        graph: &NavigationGraph,
        propagation_speed: f64,
        tick: u64,
        trail_length: usize,
    ) -> Vec<FleetId> {
        let mut arrived = Vec::new();

        for (&id, &entity) in &self.index {
            let Ok((nav, motion, trail)) = self
                .world
                .query_one_mut::<(&mut NavState, &mut Motion, &mut Trail)>(entity)
            else {
                continue;
            };
            let NavState::Travelling {
                source,
                destination,
                progress,
            } = *nav
            else {
                continue;
            };
            let (Some(from), Some(to)) = (graph.star(source), graph.star(destination)) else {
                continue;
            };

            let length = from.position.distance(to.position);
            let next = if length <= f64::EPSILON {
                1.0
            } else {
                progress + motion.velocity * propagation_speed / length
            };

            if next >= 1.0 {
                *nav = NavState::Docked {
                    at: destination,
                    since: tick,
                };
                motion.position = to.position;
                trail.points.clear();
                arrived.push(id);
            } else {
                *nav = NavState::Travelling {
                    source,
                    destination,
                    progress: next,
                };
                motion.position = from.position.lerp(to.position, next);
                trail.points.insert(0, motion.position);
                trail.points.truncate(trail_length);
            }
        }

        arrived
    }

    fn set_plan(&mut self, id: FleetId, hops: VecDeque<StarId>) {
        if let Some(&entity) = self.index.get(&id) {
            if let Ok(mut plan) = self.world.get::<&mut FlightPlan>(entity) {
                plan.hops = hops;
            }
        }
    }

    fn begin_leg(&mut self, id: FleetId, from: StarId, to: StarId) -> Option<Leg> {
        let entity = *self.index.get(&id)?;
        let (nav, trail) = self
            .world
            .query_one_mut::<(&mut NavState, &mut Trail)>(entity)
            .ok()?;
        *nav = NavState::Travelling {
            source: from,
            destination: to,
            progress: 0.0,
        };
        trail.points.clear();
        Some(Leg { fleet: id, from, to })
    }
}
