//! Observation director: decides what each observer learns and when.
//!
//! Each update ages every wavefront, resolves the orders that have reached
//! their star, then hands every broadcast to each observer whose home star
//! it has reached. Orders go first so a departure they cause is part of the
//! same update's broadcast pass.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use kelvin_core::components::Star;
use kelvin_core::enums::ObserverKind;
use kelvin_core::events::{EventPayload, FleetSnapshot, ObservableEvent};
use kelvin_core::types::{ObserverId, StarId};
use kelvin_core::{SimError, SimResult};

use crate::fleets::{FleetRegistry, Leg};
use crate::graph::NavigationGraph;
use crate::observer::Observer;
use crate::propagation::EventPropagation;
use crate::systems::movement;

#[derive(Default)]
pub struct ObservationDirector {
    observers: BTreeMap<ObserverId, Observer>,
    next_id: u32,
}

impl ObservationDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer with a copy of the current star chart.
    pub fn add_observer(
        &mut self,
        name: &str,
        kind: ObserverKind,
        home: StarId,
        color: [u8; 3],
        chart: &[Star],
        log_capacity: usize,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        let observer = Observer::new(
            id,
            name,
            kind,
            home,
            color,
            chart.iter().cloned(),
            log_capacity,
        );
        self.observers.insert(id, observer);
        id
    }

    pub fn observer(&self, id: ObserverId) -> Option<&Observer> {
        self.observers.get(&id)
    }

    pub fn try_observer(&self, id: ObserverId) -> SimResult<&Observer> {
        self.observer(id).ok_or(SimError::UnknownObserver(id))
    }

    /// Observers ascending by id.
    pub fn observers(&self) -> impl Iterator<Item = &Observer> {
        self.observers.values()
    }

    pub fn ids(&self) -> Vec<ObserverId> {
        self.observers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Put a star on every observer's chart.
    pub fn chart_star(&mut self, star: &Star) {
        for observer in self.observers.values_mut() {
            observer.chart_star(star.clone());
        }
    }

    /// Check that every observer's chart holds every star in `graph`.
    /// Every event names stars from the graph, so this rules out
    /// `InconsistentSnapshot` during delivery.
    pub fn verify_charts(&self, graph: &NavigationGraph) -> SimResult<()> {
        for observer in self.observers.values() {
            if let Some(star) = graph
                .stars()
                .iter()
                .find(|s| observer.known_star(s.id).is_none())
            {
                return Err(SimError::InconsistentSnapshot {
                    observer: observer.id,
                    star: star.id,
                });
            }
        }
        Ok(())
    }

        /// Tell a fleet's owner about it directly.
    pub fn brief_owner(&mut self, fleet: FleetSnapshot) {
        if let Some(observer) = self.observers.get_mut(&fleet.owner) {
            observer.learn_fleet(fleet);
        }
    }

    /// Run one propagation step.
    pub fn update(
        &mut self,
        propagation: &mut EventPropagation,
        fleets: &mut FleetRegistry,
        graph: &NavigationGraph,
        tick: u64,
    ) -> SimResult<()> {
        propagation.advance();

        for order in propagation.take_due_orders(graph) {
            if let Some(leg) = resolve_order(&order, fleets, graph) {
                if let Some((anchor, payload)) = movement::departure(fleets, graph, &leg) {
                    propagation.push_live(anchor, payload);
                }
            }
        }

        self.deliver_broadcasts(propagation, graph, tick)?;
        propagation.retire_delivered(&self.ids());
        Ok(())
    }

    fn deliver_broadcasts(
        &mut self,
        propagation: &mut EventPropagation,
        graph: &NavigationGraph,
        tick: u64,
    ) -> SimResult<()> {
        let speed = propagation.speed();
        for event in propagation.broadcasts_mut() {
            for observer in self.observers.values_mut() {
                if event.delivered_to.contains(&observer.id) {
                    continue;
                }
                let home = graph.try_star(observer.home)?;
                if !event.reaches(home.position, speed) {
                    continue;
                }
                if observer.apply(event, tick)? {
                    trace!(event_id = %event.id, observer = %observer.id, "event delivered");
                }
                event.delivered_to.insert(observer.id);
            }
        }
        Ok(())
    }
}

/// Execute an order that has reached its star, if it still applies.
///
/// The fleet must still exist, be docked at the order's source and belong
/// to whoever sent the order. Anything else drops the order; it never
/// retries.
fn resolve_order(
    order: &ObservableEvent,
    fleets: &mut FleetRegistry,
    graph: &NavigationGraph,
) -> Option<Leg> {
    let EventPayload::OrderFleetMove { fleet, from, to, by } = order.payload else {
        return None;
    };

    let docked_at = fleets.nav(fleet).and_then(|nav| nav.docked_at());
    let owner = fleets.owner(fleet);
    if docked_at != Some(from) || owner != Some(by) {
        debug!(
            order = %order.id,
            fleet = %fleet,
            "order dropped: fleet is no longer where the order expects"
        );
        return None;
    }

    match fleets.move_to(fleet, to, graph) {
        Ok(leg) => leg,
        Err(err) => {
            debug!(order = %order.id, %err, "order dropped");
            None
        }
    }
}
