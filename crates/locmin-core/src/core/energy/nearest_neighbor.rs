use super::EnergyModel;
use super::moves::enumerate_moves;
use super::params::EnergyParameters;
use crate::core::models::energy::Energy;
use crate::core::models::minimum::Minimum;
use crate::core::models::sequence::{Base, PairType, Sequence};
use crate::core::models::structure::Structure;

/// Loop-decomposition free-energy model.
///
/// Each base pair closes exactly one loop (hairpin, stack, bulge, interior or multiloop) and
/// the exterior loop collects the outermost pairs; the total energy is the sum of all loop
/// contributions.
#[derive(Debug, Clone)]
pub struct NearestNeighborModel {
    sequence: Sequence,
    params: EnergyParameters,
    no_lone_pairs: bool,
}

impl NearestNeighborModel {
    pub fn new(sequence: Sequence, params: EnergyParameters) -> Self {
        Self {
            sequence,
            params,
            no_lone_pairs: false,
        }
    }

    /// Restricts the move set to structures without isolated pairs.
    pub fn with_no_lone_pairs(mut self, no_lone_pairs: bool) -> Self {
        self.no_lone_pairs = no_lone_pairs;
        self
    }

    pub fn params(&self) -> &EnergyParameters {
        &self.params
    }

    fn stack(&self, outer: Option<PairType>, inner: Option<PairType>) -> Energy {
        match (outer, inner) {
            (Some(o), Some(i)) => self.params.stacking[o.index()][i.index()],
            _ => 0,
        }
    }

    fn terminal(&self, pair: Option<PairType>) -> Energy {
        match pair {
            Some(p) if p.is_weak() => self.params.terminal_au,
            _ => 0,
        }
    }

    fn mismatch(&self, five_prime: Base, three_prime: Base) -> Energy {
        let is_purine = |b: Base| matches!(b, Base::A | Base::G);
        match (is_purine(five_prime), is_purine(three_prime)) {
            (true, true) => self.params.mismatch_purine_purine,
            (true, false) | (false, true) => self.params.mismatch_purine,
            (false, false) => 0,
        }
    }

    fn hairpin(&self, i: usize, j: usize) -> Energy {
        let size = j - i - 1;
        let init = self.params.loop_initiation(&self.params.hairpin, size);
        if size >= 4 {
            init + self
                .mismatch(self.sequence.base(i + 1), self.sequence.base(j - 1))
        } else {
            init + self.terminal(self.sequence.pair_type(i, j))
        }
    }

    fn interior(&self, i: usize, j: usize, p: usize, q: usize) -> Energy {
        let outer = self.sequence.pair_type(i, j);
        // the enclosed pair is read from inside the loop, i.e. q -> p
        let inner = self.sequence.pair_type(q, p);
        let left = p - i - 1;
        let right = j - q - 1;

        match (left, right) {
            (0, 0) => self.stack(outer, self.sequence.pair_type(p, q)),
            (0, size) | (size, 0) => {
                let init = self.params.loop_initiation(&self.params.bulge, size);
                if size == 1 {
                    init + self.stack(outer, self.sequence.pair_type(p, q))
                } else {
                    init + self.terminal(outer) + self.terminal(inner)
                }
            }
            _ => {
                let init = self
                    .params
                    .loop_initiation(&self.params.interior, left + right);
                let asymmetry = (self.params.ninio_per_nucleotide
                    * left.abs_diff(right) as Energy)
                    .min(self.params.ninio_max);
                init + asymmetry + self.terminal(outer) + self.terminal(inner)
            }
        }
    }

    fn multiloop(&self, i: usize, j: usize, branches: &[(usize, usize)], unpaired: usize) -> Energy {
        let helices = branches.len() as Energy + 1;
        let mut energy = self.params.multiloop_closing
            + self.params.multiloop_branch * helices
            + self.params.multiloop_unpaired * unpaired as Energy;
        energy += self.terminal(self.sequence.pair_type(i, j));
        for &(p, q) in branches {
            energy += self.terminal(self.sequence.pair_type(p, q));
        }
        energy
    }

    /// Energy of the loop closed by the pair `(i, j)`.
    fn loop_energy(&self, structure: &Structure, i: usize, j: usize) -> Energy {
        let (branches, unpaired) = enclosed_branches(structure, i + 1, j);
        match branches.as_slice() {
            [] => self.hairpin(i, j),
            [(p, q)] => self.interior(i, j, *p, *q),
            _ => self.multiloop(i, j, &branches, unpaired),
        }
    }

    fn exterior_energy(&self, structure: &Structure) -> Energy {
        let (branches, _) = enclosed_branches(structure, 0, structure.len());
        branches
            .iter()
            .map(|&(p, q)| self.terminal(self.sequence.pair_type(p, q)))
            .sum()
    }
}

/// Pairs directly enclosed in `[from, to)` and the count of unpaired positions between them.
fn enclosed_branches(structure: &Structure, from: usize, to: usize) -> (Vec<(usize, usize)>, usize) {
    let mut branches = Vec::new();
    let mut unpaired = 0;
    let mut k = from;
    while k < to {
        match structure.partner(k) {
            Some(p) if p > k => {
                branches.push((k, p));
                k = p + 1;
            }
            _ => {
                unpaired += 1;
                k += 1;
            }
        }
    }
    (branches, unpaired)
}

impl EnergyModel for NearestNeighborModel {
    fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    fn energy_of(&self, structure: &Structure) -> Energy {
        let loops: Energy = structure
            .pairs()
            .map(|(i, j)| self.loop_energy(structure, i, j))
            .sum();
        loops + self.exterior_energy(structure)
    }

    fn neighbors(&self, structure: &Structure) -> Vec<Minimum> {
        enumerate_moves(&self.sequence, structure, self.no_lone_pairs)
            .into_iter()
            .map(|s| self.evaluate(s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(seq: &str) -> NearestNeighborModel {
        NearestNeighborModel::new(seq.parse().unwrap(), EnergyParameters::default())
    }

    fn energy(m: &NearestNeighborModel, db: &str) -> Energy {
        m.energy_of(&Structure::from_dot_bracket(db).unwrap())
    }

    #[test]
    fn open_chain_has_zero_energy() {
        let m = model("GGGGAAAACCCC");
        assert_eq!(energy(&m, "............"), 0);
    }

    #[test]
    fn hairpin_with_stacks_sums_loop_contributions() {
        let m = model("GGGGAAAACCCC");
        let p = m.params();
        // three GC/GC stacks plus a tetraloop closed by G-C with an A-A mismatch
        let expected = 3 * p.stacking[2][2] + p.hairpin[4] + p.mismatch_purine_purine;
        assert_eq!(energy(&m, "((((....))))"), expected);
    }

    #[test]
    fn stable_helix_is_below_open_chain() {
        let m = model("GGGGAAAACCCC");
        assert!(energy(&m, "((((....))))") < 0);
        assert!(energy(&m, "((((....))))") < energy(&m, "(((......)))"));
    }

    #[test]
    fn weak_exterior_pairs_pay_terminal_penalty() {
        let m = model("AGGGAAACCCU");
        let with_au = energy(&m, "((((...))))");
        let without_au = energy(&m, ".(((...))).");
        let p = m.params();
        let au_stack = p.stacking[PairType::AU.index()][PairType::GC.index()];
        assert_eq!(with_au - without_au, au_stack + p.terminal_au);
    }

    #[test]
    fn multiloop_penalty_is_applied() {
        let m = model("GGGAAAAGGGAAACCCAGGGAAACCCACCC");
        let p = m.params();
        let gc_stack = p.stacking[2][2];
        let branch = 2 * gc_stack + p.hairpin[3];
        let multiloop = p.multiloop_closing + 3 * p.multiloop_branch + 6 * p.multiloop_unpaired;
        assert_eq!(
            energy(&m, "(((....(((...))).(((...))).)))"),
            2 * gc_stack + multiloop + 2 * branch
        );
    }

    #[test]
    fn neighbors_carry_exact_energies() {
        let m = model("GGGGAAAACCCC");
        let s = Structure::from_dot_bracket("(((......)))").unwrap();
        for neighbor in m.neighbors(&s) {
            assert_eq!(neighbor.energy, m.energy_of(&neighbor.structure));
            assert_eq!(neighbor.structure.pair_distance(&s), 1);
        }
    }
}
