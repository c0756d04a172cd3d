use super::EnergyModel;
use crate::core::models::minimum::Minimum;
use crate::core::models::sequence::Sequence;
use crate::core::models::structure::Structure;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

/// Minimum number of unpaired nucleotides enclosed by a hairpin.
pub const MIN_HAIRPIN: usize = 3;

/// Default cap on the number of structures explored on one degenerate plateau.
pub const DEFAULT_PLATEAU_LIMIT: usize = 10_000;

/// Pairs `(i, j)` that could be added to `structure` as a single move.
pub fn insertable_pairs(sequence: &Sequence, structure: &Structure) -> Vec<(usize, usize)> {
    let n = structure.len();
    let mut candidates = Vec::new();
    for i in 0..n {
        if structure.is_paired(i) {
            continue;
        }
        let mut k = i + 1;
        while k < n {
            match structure.partner(k) {
                Some(p) if p > k => k = p + 1,
                Some(_) => break,
                None => {
                    if k - i > MIN_HAIRPIN && sequence.can_pair(i, k) {
                        candidates.push((i, k));
                    }
                    k += 1;
                }
            }
        }
    }
    candidates
}

/// All structures one move away from `structure`.
///
/// A move inserts or deletes one base pair. With `no_lone_pairs` set, moves producing an
/// isolated pair are dropped and stacked double insertions/deletions are offered instead, so
/// the lone-pair-free subspace stays connected.
pub fn enumerate_moves(
    sequence: &Sequence,
    structure: &Structure,
    no_lone_pairs: bool,
) -> Vec<Structure> {
    let mut moves = Vec::new();
    let pairs: Vec<_> = structure.pairs().collect();
    let insertable = insertable_pairs(sequence, structure);

    for &(i, _) in &pairs {
        let mut s = structure.clone();
        s.remove_pair(i);
        moves.push(s);
    }
    for &(i, j) in &insertable {
        let mut s = structure.clone();
        s.insert_pair(i, j);
        moves.push(s);
    }

    if no_lone_pairs {
        for &(i, j) in &pairs {
            if structure.has_pair(i + 1, j - 1) {
                let mut s = structure.clone();
                s.remove_pair(i);
                s.remove_pair(i + 1);
                moves.push(s);
            }
        }
        for &(i, j) in &insertable {
            if j - i - 1 < MIN_HAIRPIN + 2 || !sequence.can_pair(i + 1, j - 1) {
                continue;
            }
            let mut s = structure.clone();
            s.insert_pair(i, j);
            if s.can_insert(i + 1, j - 1) {
                s.insert_pair(i + 1, j - 1);
                moves.push(s);
            }
        }
        moves.retain(|s| s.find_lone_pair().is_none());
    }

    moves
}

/// Descent steps over an [`EnergyModel`].
///
/// The move set owns the scratch buffers used to resolve degenerate plateaus. A plateau is
/// the set of equal-energy structures connected to the current one; when no neighbor is
/// strictly lower, the whole plateau is searched for an exit, and if none exists the
/// smallest structure of the plateau becomes the canonical representative. Callers reset
/// the scratch with [`MoveSet::clear_scratch`] after each step.
pub struct MoveSet<'a, M: EnergyModel + ?Sized> {
    model: &'a M,
    plateau_limit: usize,
    plateau: HashSet<Structure>,
    frontier: VecDeque<Minimum>,
}

impl<'a, M: EnergyModel + ?Sized> MoveSet<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self {
            model,
            plateau_limit: DEFAULT_PLATEAU_LIMIT,
            plateau: HashSet::new(),
            frontier: VecDeque::new(),
        }
    }

    pub fn with_plateau_limit(mut self, limit: usize) -> Self {
        self.plateau_limit = limit.max(1);
        self
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    /// Moves `current` to its lowest strictly-improving neighbor.
    ///
    /// Ties are broken by structure order. Returns `false` once `current` is the canonical
    /// local minimum of its plateau.
    pub fn apply_best_move(&mut self, current: &mut Minimum) -> bool {
        let best = self
            .model
            .neighbors(&current.structure)
            .into_iter()
            .filter(|n| n.energy < current.energy)
            .min();
        if let Some(best) = best {
            *current = best;
            return true;
        }
        self.leave_plateau(current, |lower| lower.into_iter().min())
    }

    /// Moves `current` to a uniformly chosen strictly-improving neighbor.
    pub fn apply_random_improving_move<R: Rng>(
        &mut self,
        current: &mut Minimum,
        rng: &mut R,
    ) -> bool {
        let mut improving: Vec<_> = self
            .model
            .neighbors(&current.structure)
            .into_iter()
            .filter(|n| n.energy < current.energy)
            .collect();
        if !improving.is_empty() {
            let pick = rng.gen_range(0..improving.len());
            *current = improving.swap_remove(pick);
            return true;
        }
        self.leave_plateau(current, |mut lower| {
            if lower.is_empty() {
                None
            } else {
                lower.sort_unstable();
                let pick = rng.gen_range(0..lower.len());
                Some(lower.swap_remove(pick))
            }
        })
    }

    pub fn clear_scratch(&mut self) {
        self.plateau.clear();
        self.frontier.clear();
    }

    fn leave_plateau(
        &mut self,
        current: &mut Minimum,
        pick_exit: impl FnOnce(Vec<Minimum>) -> Option<Minimum>,
    ) -> bool {
        self.clear_scratch();
        let level = current.energy;
        let mut canonical = current.structure.clone();
        let mut lower = Vec::new();

        self.plateau.insert(current.structure.clone());
        self.frontier.push_back(current.clone());

        while let Some(member) = self.frontier.pop_front() {
            for neighbor in self.model.neighbors(&member.structure) {
                if neighbor.energy < level {
                    lower.push(neighbor);
                } else if neighbor.energy == level
                    && self.plateau.len() < self.plateau_limit
                    && !self.plateau.contains(&neighbor.structure)
                {
                    self.plateau.insert(neighbor.structure.clone());
                    if neighbor.structure < canonical {
                        canonical = neighbor.structure.clone();
                    }
                    self.frontier.push_back(neighbor);
                }
            }
        }

        if let Some(exit) = pick_exit(lower) {
            *current = exit;
            return true;
        }
        if canonical != current.structure {
            current.structure = canonical;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::energy::testing::{TableModel, st};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn insertable_pairs_respect_hairpin_and_nesting() {
        let seq: Sequence = "GGGAAACCC".parse().unwrap();
        let open = Structure::open_chain(9);
        let pairs = insertable_pairs(&seq, &open);
        assert!(pairs.contains(&(0, 8)));
        assert!(pairs.contains(&(2, 6)));
        assert!(pairs.iter().all(|&(i, j)| j - i > MIN_HAIRPIN));
        assert!(pairs.iter().all(|&(i, j)| seq.can_pair(i, j)));

        let closed = st("(.......)");
        let inner = insertable_pairs(&seq, &closed);
        assert!(inner.iter().all(|&(i, j)| i > 0 && j < 8));
    }

    #[test]
    fn enumerate_moves_contains_every_deletion_and_insertion() {
        let seq: Sequence = "GGGAAACCC".parse().unwrap();
        let s = st("(.......)");
        let moves = enumerate_moves(&seq, &s, false);
        assert!(moves.contains(&Structure::open_chain(9)));
        assert!(moves.contains(&st("((.....))")));
        let expected = 1 + insertable_pairs(&seq, &s).len();
        assert_eq!(moves.len(), expected);
    }

    #[test]
    fn no_lone_pair_moves_never_create_isolated_pairs() {
        let seq: Sequence = "GGGGAAAACCCC".parse().unwrap();
        let s = st("((........))");
        let moves = enumerate_moves(&seq, &s, true);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.find_lone_pair().is_none()));
        assert!(moves.contains(&Structure::open_chain(12)));
        assert!(moves.contains(&st("((((....))))")));
    }

    #[test]
    fn best_move_picks_lowest_neighbor() {
        let model = TableModel::new(10)
            .state("(........)", 0)
            .state("((......))", -30)
            .state("(.(....).)", -20)
            .edge("(........)", "((......))")
            .edge("(........)", "(.(....).)");
        let mut moves = MoveSet::new(&model);
        let mut current = model.evaluate(st("(........)"));
        assert!(moves.apply_best_move(&mut current));
        assert_eq!(current.structure, st("((......))"));
        assert_eq!(current.energy, -30);
    }

    #[test]
    fn plateau_resolves_to_smallest_member_then_stops() {
        let model = TableModel::new(10)
            .state("(........)", -10)
            .state(".(......).", -10)
            .state("..........", 5)
            .edge("(........)", ".(......).")
            .edge("(........)", "..........");
        let mut moves = MoveSet::new(&model);
        let mut current = model.evaluate(st("(........)"));
        assert!(moves.apply_best_move(&mut current));
        moves.clear_scratch();
        assert_eq!(current.structure, st(".(......)."));
        assert!(!moves.apply_best_move(&mut current));
        assert_eq!(current.energy, -10);
    }

    #[test]
    fn plateau_exit_is_taken_when_reachable() {
        let model = TableModel::new(10)
            .state("(........)", -10)
            .state(".(......).", -10)
            .state(".((....)).", -40)
            .edge("(........)", ".(......).")
            .edge(".(......).", ".((....)).");
        let mut moves = MoveSet::new(&model);
        let mut current = model.evaluate(st("(........)"));
        assert!(moves.apply_best_move(&mut current));
        assert_eq!(current.structure, st(".((....))."));
    }

    #[test]
    fn random_move_only_picks_improving_neighbors() {
        let model = TableModel::new(10)
            .state("(........)", 0)
            .state("((......))", -30)
            .state("(.(....).)", -20)
            .state("(..(..)..)", 10)
            .edge("(........)", "((......))")
            .edge("(........)", "(.(....).)")
            .edge("(........)", "(..(..)..)");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut moves = MoveSet::new(&model);
            let mut current = model.evaluate(st("(........)"));
            assert!(moves.apply_random_improving_move(&mut current, &mut rng));
            assert!(current.energy < 0);
        }
    }
}
