use crate::core::energy::EnergyModel;
use crate::core::models::energy::Energy;
use crate::core::models::minimum::Minimum;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use tracing::trace;

/// Where a flooded basin first spills over.
#[derive(Debug, Clone, PartialEq)]
pub struct Escape {
    /// Energy of the configuration from which the lower neighbor was reached.
    pub saddle: Energy,
    /// First configuration found strictly below the seed.
    pub exit: Minimum,
}

/// Fills a basin from its bottom, lowest configurations first, until it spills over.
pub struct Flooder<'a, M: EnergyModel + ?Sized> {
    model: &'a M,
    max_visited: usize,
}

impl<'a, M: EnergyModel + ?Sized> Flooder<'a, M> {
    pub fn new(model: &'a M, max_visited: usize) -> Self {
        Self {
            model,
            max_visited: max_visited.max(1),
        }
    }

    /// Floods the basin of `seed`.
    ///
    /// Configurations are expanded in ascending `(energy, structure)` order. The first neighbor
    /// strictly below the seed ends the flood, and the energy of the configuration being
    /// expanded at that point is the saddle. Returns `None` when the lowest frontier energy
    /// exceeds the seed by more than `height_limit`, when more than the configured number of
    /// configurations has been visited, or when the reachable region is exhausted.
    pub fn flood(&self, seed: &Minimum, height_limit: Option<Energy>) -> Option<Escape> {
        let mut frontier = BinaryHeap::new();
        let mut visited = HashSet::new();
        visited.insert(seed.structure.clone());
        frontier.push(Reverse(seed.clone()));

        while let Some(Reverse(current)) = frontier.pop() {
            if height_limit.is_some_and(|limit| current.energy - seed.energy > limit) {
                return None;
            }

            for neighbor in self.model.neighbors(&current.structure) {
                if neighbor.energy < seed.energy {
                    return Some(Escape {
                        saddle: current.energy,
                        exit: neighbor,
                    });
                }
                if visited.contains(&neighbor.structure) {
                    continue;
                }
                if visited.len() >= self.max_visited {
                    trace!(
                        structure = %seed.structure,
                        visited = visited.len(),
                        "Flood exceeded its visit budget"
                    );
                    return None;
                }
                visited.insert(neighbor.structure.clone());
                frontier.push(Reverse(neighbor));
            }
        }
        None
    }
}
