use crate::core::energy::EnergyModel;
use crate::core::models::energy::Energy;
use crate::core::models::structure::Structure;
use std::collections::HashMap;

/// Estimates the lowest saddle on a path between two structures.
pub trait SaddleEstimator: Send + Sync {
    /// Highest energy along the best path found, or `None` if no path was found.
    /// `search_depth` trades accuracy for time.
    fn estimate_saddle(&self, from: &Structure, to: &Structure, search_depth: usize) -> Option<Energy>;
}

#[derive(Debug, Clone)]
struct PathState {
    structure: Structure,
    energy: Energy,
    /// Highest energy met on the way here.
    peak: Energy,
}

/// Beam search over direct refolding paths.
///
/// A direct path only removes pairs of the start that the target lacks and only adds pairs
/// of the target, so it has exactly as many steps as the base-pair distance. At every step
/// the `search_depth` states with the lowest peak are kept.
pub struct DirectPathEstimator<'a, M: EnergyModel + ?Sized> {
    model: &'a M,
}

impl<'a, M: EnergyModel + ?Sized> DirectPathEstimator<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    fn successors(
        &self,
        state: &PathState,
        removals: &[(usize, usize)],
        additions: &[(usize, usize)],
    ) -> Vec<PathState> {
        let mut next = Vec::new();
        for &(i, j) in removals {
            if state.structure.has_pair(i, j) {
                let mut structure = state.structure.clone();
                structure.remove_pair(i);
                next.push(self.advance(state, structure));
            }
        }
        for &(i, j) in additions {
            if state.structure.can_insert(i, j) {
                let mut structure = state.structure.clone();
                structure.insert_pair(i, j);
                next.push(self.advance(state, structure));
            }
        }
        next
    }

    fn advance(&self, from: &PathState, structure: Structure) -> PathState {
        let energy = self.model.energy_of(&structure);
        PathState {
            structure,
            energy,
            peak: from.peak.max(energy),
        }
    }
}

impl<M: EnergyModel + ?Sized> SaddleEstimator for DirectPathEstimator<'_, M> {
    fn estimate_saddle(&self, from: &Structure, to: &Structure, search_depth: usize) -> Option<Energy> {
        if from.len() != to.len() {
            return None;
        }
        let removals: Vec<_> = from.pairs().filter(|&(i, j)| !to.has_pair(i, j)).collect();
        let additions: Vec<_> = to.pairs().filter(|&(i, j)| !from.has_pair(i, j)).collect();
        let width = search_depth.max(1);

        let energy = self.model.energy_of(from);
        let mut beam = vec![PathState {
            structure: from.clone(),
            energy,
            peak: energy,
        }];

        for _ in 0..removals.len() + additions.len() {
            let mut best: HashMap<Structure, PathState> = HashMap::new();
            for state in &beam {
                for candidate in self.successors(state, &removals, &additions) {
                    match best.get(&candidate.structure) {
                        Some(known) if known.peak <= candidate.peak => {}
                        _ => {
                            best.insert(candidate.structure.clone(), candidate);
                        }
                    }
                }
            }
            let mut next: Vec<_> = best.into_values().collect();
            next.sort_by(|a, b| {
                a.peak
                    .cmp(&b.peak)
                    .then(a.energy.cmp(&b.energy))
                    .then_with(|| a.structure.cmp(&b.structure))
            });
            next.truncate(width);
            if next.is_empty() {
                return None;
            }
            beam = next;
        }

        beam.iter()
            .filter(|state| &state.structure == to)
            .map(|state| state.peak)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::energy::nearest_neighbor::NearestNeighborModel;
    use crate::core::energy::params::EnergyParameters;
    use crate::core::energy::testing::{TableModel, st};

    #[test]
    fn identical_structures_have_their_own_energy_as_saddle() {
        let model = TableModel::new(8).state("((....))", -40);
        let estimator = DirectPathEstimator::new(&model);
        let s = st("((....))");
        assert_eq!(estimator.estimate_saddle(&s, &s, 5), Some(-40));
    }

    #[test]
    fn saddle_is_the_peak_of_the_best_path() {
        // adding first passes the triple helix at 50, removing first passes 10
        let model = TableModel::new(12)
            .state("((........))", -100)
            .state("(((......)))", 50)
            .state(".(........).", 10)
            .state(".((......)).", -80);
        let estimator = DirectPathEstimator::new(&model);
        let saddle = estimator.estimate_saddle(&st("((........))"), &st(".((......))."), 4);
        assert_eq!(saddle, Some(10));
    }

    #[test]
    fn saddle_bounds_both_endpoints() {
        let model = NearestNeighborModel::new(
            "GGGGAAAACCCCAGGGAAACCC".parse().unwrap(),
            EnergyParameters::default(),
        );
        let estimator = DirectPathEstimator::new(&model);
        let a = st("((((....))))..........");
        let b = st(".............(((...)))");
        let saddle = estimator.estimate_saddle(&a, &b, 3).unwrap();
        assert!(saddle >= model.energy_of(&a));
        assert!(saddle >= model.energy_of(&b));
    }

    #[test]
    fn wider_search_never_finds_a_higher_saddle() {
        let model = NearestNeighborModel::new(
            "GGGGAAAACCCCAGGGAAACCC".parse().unwrap(),
            EnergyParameters::default(),
        );
        let estimator = DirectPathEstimator::new(&model);
        let a = st("((((....))))..........");
        let b = st(".............(((...)))");
        // 50 covers every intermediate of this seven-step path, so the wide search is exact
        let narrow = estimator.estimate_saddle(&a, &b, 1).unwrap();
        let wide = estimator.estimate_saddle(&a, &b, 50).unwrap();
        assert!(wide <= narrow);
    }

    #[test]
    fn mismatched_lengths_have_no_path() {
        let model = TableModel::new(8);
        let estimator = DirectPathEstimator::new(&model);
        assert_eq!(estimator.estimate_saddle(&st("((....))"), &st("(....)"), 3), None);
    }
}
