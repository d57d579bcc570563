//! Per-observer fog-of-war snapshot.
//!
//! An observer holds its own copies of stars and fleets as they were when
//! the last relevant event reached its home star. Nothing here aliases the
//! canonical world state.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use kelvin_core::components::Star;
use kelvin_core::enums::ObserverKind;
use kelvin_core::events::{EventPayload, FleetSnapshot, LogEntry, ObservableEvent};
use kelvin_core::state::ObserverView;
use kelvin_core::types::{EventId, FleetId, ObserverId, StarId};
use kelvin_core::{SimError, SimResult};

#[derive(Debug, Clone)]
pub struct Observer {
    pub id: ObserverId,
    pub name: String,
    pub kind: ObserverKind,
    pub home: StarId,
    pub color: [u8; 3],
    known_stars: BTreeMap<StarId, Star>,
    known_idle_fleets: BTreeMap<FleetId, FleetSnapshot>,
    known_travelling_fleets: BTreeMap<FleetId, FleetSnapshot>,
    seen_events: BTreeSet<EventId>,
    /// Id of the newest event applied per fleet.
    fleet_news: BTreeMap<FleetId, EventId>,
    log: VecDeque<LogEntry>,
    log_capacity: usize,
}

impl Observer {
    pub fn new(
        id: ObserverId,
        name: impl Into<String>,
        kind: ObserverKind,
        home: StarId,
        color: [u8; 3],
        chart: impl IntoIterator<Item = Star>,
        log_capacity: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            home,
            color,
            known_stars: chart.into_iter().map(|s| (s.id, s)).collect(),
            known_idle_fleets: BTreeMap::new(),
            known_travelling_fleets: BTreeMap::new(),
            seen_events: BTreeSet::new(),
            fleet_news: BTreeMap::new(),
            log: VecDeque::with_capacity(log_capacity),
            log_capacity,
        }
    }

    pub fn known_stars(&self) -> impl Iterator<Item = &Star> {
        self.known_stars.values()
    }

    pub fn known_star(&self, id: StarId) -> Option<&Star> {
        self.known_stars.get(&id)
    }

    pub fn known_idle_fleets(&self) -> impl Iterator<Item = &FleetSnapshot> {
        self.known_idle_fleets.values()
    }

    pub fn known_travelling_fleets(&self) -> impl Iterator<Item = &FleetSnapshot> {
        self.known_travelling_fleets.values()
    }

    pub fn knows_idle(&self, id: FleetId) -> bool {
        self.known_idle_fleets.contains_key(&id)
    }

    pub fn knows_travelling(&self, id: FleetId) -> bool {
        self.known_travelling_fleets.contains_key(&id)
    }

    pub fn has_seen(&self, id: EventId) -> bool {
        self.seen_events.contains(&id)
    }

    /// Message log, oldest first. Always empty for automated observers.
    pub fn log(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.iter()
    }

    /// Add or replace a star on the chart without an event.
    pub fn chart_star(&mut self, star: Star) {
        self.known_stars.insert(star.id, star);
    }

    /// Record a fleet this observer knows about without an event.
    pub fn learn_fleet(&mut self, fleet: FleetSnapshot) {
        if fleet.nav.is_docked() {
            self.known_travelling_fleets.remove(&fleet.id);
            self.known_idle_fleets.insert(fleet.id, fleet);
        } else {
            self.known_idle_fleets.remove(&fleet.id);
            self.known_travelling_fleets.insert(fleet.id, fleet);
        }
    }

    /// Apply a delivered broadcast. Returns `Ok(false)` if this event was
    /// already applied or is not a broadcast.
    ///
    /// Every invariant is checked before anything is mutated, so a failed
    /// application leaves the snapshot untouched. News about a fleet that
    /// is older than the newest already applied for it is logged but does
    /// not overwrite the snapshot; event ids follow the order in which
    /// fleets changed state.
    pub fn apply(&mut self, event: &ObservableEvent, tick: u64) -> SimResult<bool> {
        if self.seen_events.contains(&event.id) {
            return Ok(false);
        }

        match &event.payload {
            EventPayload::FleetDeparture { fleet, from, to } => {
                let own = fleet.owner == self.id;
                if own {
                    self.ensure_charted(from.id)?;
                }
                if self.stamp_fleet(fleet.id, event.id) {
                    self.known_idle_fleets.remove(&fleet.id);
                    self.known_travelling_fleets.insert(fleet.id, fleet.clone());
                    if own {
                        self.known_stars.insert(from.id, from.clone());
                    }
                }
                self.record(
                    tick,
                    format!("Fleet {} departed {} for {}", fleet.id, from.name, to.name),
                );
            }
            EventPayload::FleetArrival { fleet, star } => {
                let own = fleet.owner == self.id;
                if own {
                    self.ensure_charted(star.id)?;
                }
                if self.stamp_fleet(fleet.id, event.id) {
                    self.known_travelling_fleets.remove(&fleet.id);
                    self.known_idle_fleets.insert(fleet.id, fleet.clone());
                    if own {
                        self.known_stars.insert(star.id, star.clone());
                    }
                }
                self.record(tick, format!("Fleet {} arrived at {}", fleet.id, star.name));
            }
            EventPayload::CombatReport {
                star, destroyed, ..
            } => {
                // Destroyed fleets stay forgotten.
                self.fleet_news.insert(destroyed.id, EventId(u64::MAX));
                self.known_idle_fleets.remove(&destroyed.id);
                self.known_travelling_fleets.remove(&destroyed.id);
                self.record(
                    tick,
                    format!("Fleet {} destroyed at {}", destroyed.id, star.name),
                );
            }
            EventPayload::OrderFleetMove { .. } => return Ok(false),
        }

        self.seen_events.insert(event.id);
        Ok(true)
    }

    pub fn view(&self) -> ObserverView {
        ObserverView {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            home: self.home,
            color: self.color,
            known_stars: self.known_stars.values().cloned().collect(),
            known_idle_fleets: self.known_idle_fleets.values().cloned().collect(),
            known_travelling_fleets: self.known_travelling_fleets.values().cloned().collect(),
            log: self.log.iter().cloned().collect(),
        }
    }

    /// Note `event` as the latest news about `fleet`. False if newer news
    /// was already applied.
    fn stamp_fleet(&mut self, fleet: FleetId, event: EventId) -> bool {
        match self.fleet_news.get(&fleet) {
            Some(&newest) if newest > event => false,
            _ => {
                self.fleet_news.insert(fleet, event);
                true
            }
        }
    }

    fn ensure_charted(&self, star: StarId) -> SimResult<()> {
        if self.known_stars.contains_key(&star) {
            Ok(())
        } else {
            Err(SimError::InconsistentSnapshot {
                observer: self.id,
                star,
            })
        }
    }

    fn record(&mut self, tick: u64, message: String) {
        if self.kind != ObserverKind::Human || self.log_capacity == 0 {
            return;
        }
        while self.log.len() >= self.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry { tick, message });
    }
}
