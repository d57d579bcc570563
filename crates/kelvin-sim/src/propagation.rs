//! In-flight events and their expanding wavefronts.
//!
//! Events emitted while a tick is running go to `order_add_queue` and only
//! join the live set when the tick commits, so the live collection is never
//! grown while it is being walked.

use glam::DVec2;

use kelvin_core::events::{EventPayload, ObservableEvent};
use kelvin_core::types::{EventId, ObserverId};

use crate::graph::NavigationGraph;

pub struct EventPropagation {
    live: Vec<ObservableEvent>,
    order_add_queue: Vec<ObservableEvent>,
    next_event_id: u64,
    speed: f64,
}

impl EventPropagation {
    pub fn new(speed: f64) -> Self {
        Self {
            live: Vec::new(),
            order_add_queue: Vec::new(),
            next_event_id: 0,
            speed,
        }
    }

    /// Distance a wavefront grows per tick.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Live events in the order they went live.
    pub fn live(&self) -> &[ObservableEvent] {
        &self.live
    }

    /// Events emitted this tick, not yet committed.
    pub fn pending(&self) -> &[ObservableEvent] {
        &self.order_add_queue
    }

    /// Queue an event emitted during a tick. It starts aging after commit.
    pub fn emit(&mut self, anchor: DVec2, payload: EventPayload) -> EventId {
        let event = self.allocate(anchor, payload);
        let id = event.id;
        self.order_add_queue.push(event);
        id
    }

    /// Put an event straight into the live set. Only valid while the live
    /// set is not being iterated: between ticks, or between delivery passes.
    pub fn push_live(&mut self, anchor: DVec2, payload: EventPayload) -> EventId {
        let event = self.allocate(anchor, payload);
        let id = event.id;
        self.live.push(event);
        id
    }

    /// Age every live event by one tick.
    pub fn advance(&mut self) {
        for event in &mut self.live {
            event.t += 1;
        }
    }

    /// Remove and return the orders whose wavefront has reached the star
    /// they are addressed to, in the order they went live.
    pub fn take_due_orders(&mut self, graph: &NavigationGraph) -> Vec<ObservableEvent> {
        let speed = self.speed;
        let (due, keep): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.live)
                .into_iter()
                .partition(|event| match event.payload {
                    EventPayload::OrderFleetMove { from, .. } => graph
                        .star(from)
                        .is_some_and(|star| event.reaches(star.position, speed)),
                    _ => false,
                });
        self.live = keep;
        due
    }

    /// Live broadcast events, for the delivery pass.
    pub fn broadcasts_mut(&mut self) -> impl Iterator<Item = &mut ObservableEvent> {
        self.live.iter_mut().filter(|e| e.kind().is_broadcast())
    }

    /// Drop broadcasts every listed observer has received.
    pub fn retire_delivered(&mut self, observers: &[ObserverId]) {
        self.live.retain(|event| {
            !event.kind().is_broadcast()
                || observers.iter().any(|o| !event.delivered_to.contains(o))
        });
    }

    /// Move this tick's emitted events into the live set.
    pub fn commit(&mut self) {
        self.live.append(&mut self.order_add_queue);
    }

    fn allocate(&mut self, anchor: DVec2, payload: EventPayload) -> ObservableEvent {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        ObservableEvent::new(id, anchor, payload)
    }
}
