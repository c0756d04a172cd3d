//! # Energy Module
//!
//! The folding-model seam of the library. Everything the exploration engine needs from a
//! free-energy model is expressed by the [`EnergyModel`] trait; [`nearest_neighbor`] provides
//! a loop-decomposition implementation with TOML-loadable [`params`], and [`moves`] derives
//! steepest, randomized and plateau-aware descent steps from any model.

pub mod moves;
pub mod nearest_neighbor;
pub mod params;

use crate::core::models::energy::Energy;
use crate::core::models::minimum::Minimum;
use crate::core::models::sequence::Sequence;
use crate::core::models::structure::Structure;

/// A free-energy model over the secondary structures of one fixed sequence.
///
/// Two structures are adjacent when [`EnergyModel::neighbors`] of one contains the other.
/// Implementations must keep this relation symmetric and must return neighbors together with
/// their exact energies, as flooding relies on both.
pub trait EnergyModel: Send + Sync {
    fn sequence(&self) -> &Sequence;

    fn energy_of(&self, structure: &Structure) -> Energy;

    /// Every structure reachable by a single move, with its energy.
    fn neighbors(&self, structure: &Structure) -> Vec<Minimum>;

    fn has_lone_pairs(&self, structure: &Structure) -> bool {
        structure.find_lone_pair().is_some()
    }

    /// Whether every pair of `structure` is allowed by the sequence.
    fn admits(&self, structure: &Structure) -> bool {
        let sequence = self.sequence();
        structure.len() == sequence.len()
            && structure.pairs().all(|(i, j)| sequence.can_pair(i, j))
    }

    fn evaluate(&self, structure: Structure) -> Minimum {
        let energy = self.energy_of(&structure);
        Minimum::new(structure, energy)
    }
}

#[cfg(test)]
pub(crate) mod testing;
