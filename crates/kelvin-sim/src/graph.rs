//! Star connectivity graph and hop-count routing.
//!
//! Stars live in a dense arena indexed by `StarId`. Lanes are undirected;
//! each endpoint keeps its neighbours in insertion order, which fixes the
//! BFS tie-break between equal-length routes.

use std::collections::VecDeque;

use glam::DVec2;

use kelvin_core::components::Star;
use kelvin_core::types::{ObserverId, StarId};
use kelvin_core::{SimError, SimResult};

#[derive(Debug, Clone, Default)]
pub struct NavigationGraph {
    stars: Vec<Star>,
}

impl NavigationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a star. Names are unique.
    pub fn add_star(&mut self, name: &str, position: DVec2) -> SimResult<StarId> {
        if self.find_by_name(name).is_some() {
            return Err(SimError::DuplicateStarName(name.to_string()));
        }
        let id = StarId(self.stars.len() as u32);
        self.stars.push(Star::new(id, name, position));
        Ok(id)
    }

    /// Connect two stars. Repeating an existing lane changes nothing.
    pub fn add_edge(&mut self, a: StarId, b: StarId) -> SimResult<()> {
        self.try_star(a)?;
        self.try_star(b)?;
        if a == b {
            return Err(SimError::SelfLoop(a));
        }
        if !self.stars[a.0 as usize].is_adjacent(b) {
            self.stars[a.0 as usize].neighbors.push(b);
            self.stars[b.0 as usize].neighbors.push(a);
        }
        Ok(())
    }

    pub fn star(&self, id: StarId) -> Option<&Star> {
        self.stars.get(id.0 as usize)
    }

    pub fn try_star(&self, id: StarId) -> SimResult<&Star> {
        self.star(id).ok_or(SimError::UnknownStar(id))
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<StarId> {
        self.stars.iter().find(|s| s.name == name).map(|s| s.id)
    }

    pub fn neighbors(&self, id: StarId) -> &[StarId] {
        self.star(id).map(|s| s.neighbors.as_slice()).unwrap_or(&[])
    }

    pub fn are_adjacent(&self, a: StarId, b: StarId) -> bool {
        self.star(a).is_some_and(|s| s.is_adjacent(b))
    }

    /// Straight-line distance between two stars.
    pub fn distance(&self, a: StarId, b: StarId) -> Option<f64> {
        Some(self.star(a)?.position.distance(self.star(b)?.position))
    }

    /// Every lane once, as `(lower id, higher id)`.
    pub fn edges(&self) -> Vec<(StarId, StarId)> {
        self.stars
            .iter()
            .flat_map(|s| {
                s.neighbors
                    .iter()
                    .filter(move |&&n| s.id < n)
                    .map(move |&n| (s.id, n))
            })
            .collect()
    }

    pub fn relocate(&mut self, id: StarId, position: DVec2) -> SimResult<()> {
        let star = self.star_mut(id)?;
        star.position = position;
        Ok(())
    }

    pub fn set_owner(&mut self, id: StarId, owner: Option<ObserverId>) -> SimResult<()> {
        let star = self.star_mut(id)?;
        star.owner = owner;
        Ok(())
    }

    /// Fewest-hops route from `from` to `to`, both inclusive.
    ///
    /// Empty if either star is unknown or `to` is unreachable. Among routes
    /// of equal length the one found first in lane insertion order wins.
    pub fn shortest_path(&self, from: StarId, to: StarId) -> Vec<StarId> {
        if self.star(from).is_none() || self.star(to).is_none() {
            return Vec::new();
        }
        if from == to {
            return vec![from];
        }

        let mut parent: Vec<Option<StarId>> = vec![None; self.stars.len()];
        let mut visited = vec![false; self.stars.len()];
        let mut queue = VecDeque::new();
        visited[from.0 as usize] = true;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for &next in self.neighbors(current) {
                if visited[next.0 as usize] {
                    continue;
                }
                visited[next.0 as usize] = true;
                parent[next.0 as usize] = Some(current);
                if next == to {
                    return self.unwind(&parent, from, to);
                }
                queue.push_back(next);
            }
        }

        Vec::new()
    }

    fn unwind(&self, parent: &[Option<StarId>], from: StarId, to: StarId) -> Vec<StarId> {
        let mut path = vec![to];
        let mut cursor = to;
        while cursor != from {
            match parent[cursor.0 as usize] {
                Some(p) => {
                    path.push(p);
                    cursor = p;
                }
                None => return Vec::new(),
            }
        }
        path.reverse();
        path
    }

    fn star_mut(&mut self, id: StarId) -> SimResult<&mut Star> {
        self.stars
            .get_mut(id.0 as usize)
            .ok_or(SimError::UnknownStar(id))
    }
}
